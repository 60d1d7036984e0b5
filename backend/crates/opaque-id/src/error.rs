//! Errors raised by the opaque identifier codec.

use thiserror::Error;

/// Failures from constructing the codec or translating identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpaqueIdError {
    /// The salt was empty or whitespace-only.
    #[error("opaque id salt must not be empty")]
    EmptySalt,
    /// The hashids tables could not be derived from the settings.
    #[error("opaque id codec could not be built: {0}")]
    Build(String),
    /// The identifier is outside the signed 64-bit positive range.
    #[error("identifier {id} exceeds the maximum encodable value")]
    OutOfRange {
        /// Identifier that was rejected.
        id: u64,
    },
    /// The opaque string was not produced by this codec.
    ///
    /// Corrupt input and never-issued values are deliberately not
    /// distinguished.
    #[error("opaque identifier is invalid")]
    Invalid,
}
