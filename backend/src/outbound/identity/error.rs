//! Reasons a bearer token is rejected.
//!
//! These stay server-side. Callers only ever see `Unauthorized`.

use thiserror::Error;

use crate::domain::UserValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token algorithm {0} is not allowed")]
    DisallowedAlgorithm(String),

    #[error("token header carries no key id")]
    MissingKeyId,

    #[error("signing key {0} is not published")]
    UnknownKeyId(String),

    #[error("signing key is unusable: {0}")]
    UnsupportedKey(String),

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims were rejected: {0}")]
    Rejected(String),

    #[error("token carries no email claim")]
    MissingEmail,

    #[error("token email is not verified")]
    UnverifiedEmail,

    #[error("token email is invalid: {0}")]
    InvalidEmail(#[from] UserValidationError),
}
