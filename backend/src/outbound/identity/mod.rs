//! Identity token verification.
//!
//! [`JwtIdentityResolver`] checks bearer tokens against the identity
//! provider's published signing keys and maps verified claims onto a domain
//! [`crate::domain::User`]. Keys live in a [`JwksCache`] owned by the resolver
//! and are fetched lazily on first use.

mod config;
mod error;
mod jwks;
mod resolver;

pub use config::{GOOGLE_DISCOVERY_URL, GOOGLE_ISSUERS, IdentityConfig, KeySetLocation};
pub use error::IdentityError;
pub use jwks::JwksCache;
pub use resolver::JwtIdentityResolver;
