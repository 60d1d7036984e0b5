//! Driving port for signing in a resolved identity.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Records a verified user on sign-in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignInCommand: Send + Sync {
    /// Validate and upsert `user`. Repeated calls are idempotent.
    async fn sign_in(&self, user: &User) -> Result<(), Error>;
}
