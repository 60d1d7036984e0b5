//! Port for persisting signed-in users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// A connection could not be obtained.
        Connection { message: String } =>
            "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user store query failed: {message}",
    }
}

/// Port for recording users who have signed in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the user, or refresh name and subject when the email is known.
    ///
    /// `seen_at` stamps creation for new users and the update otherwise.
    async fn upsert(&self, user: &User, seen_at: DateTime<Utc>) -> Result<(), UserStoreError>;
}
