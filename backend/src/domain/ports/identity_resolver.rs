//! Port turning a bearer token into a verified [`User`].

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Verifies raw identity tokens.
///
/// Implementations must reject every invalid token with
/// [`crate::domain::ErrorCode::Unauthorized`] without revealing the reason to
/// the caller, and must not persist anything.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `token` into the identity it asserts.
    async fn resolve(&self, token: &str) -> Result<User, Error>;
}
