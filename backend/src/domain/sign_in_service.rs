//! Sign-in workflow: record a verified identity as a known user.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{SignInCommand, UserStore, UserStoreError};
use crate::domain::{Error, ErrorCode, User};

fn map_store_error(error: UserStoreError) -> Error {
    Error::internal(error.to_string())
}

/// Service upserting users on sign-in.
#[derive(Clone)]
pub struct SignInService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> SignInService<U> {
    /// Create a sign-in service over `users`, stamping upserts with `clock`.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U> SignInCommand for SignInService<U>
where
    U: UserStore,
{
    async fn sign_in(&self, user: &User) -> Result<(), Error> {
        if user.provider_subject().trim().is_empty() {
            return Err(Error::new(ErrorCode::EmptyUser).wrap("provider subject is empty"));
        }
        self.users
            .upsert(user, self.clock.utc())
            .await
            .map_err(map_store_error)?;
        info!("user signed in");
        Ok(())
    }
}
