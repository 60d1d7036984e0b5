//! Multi-tenant medical record service.
//!
//! Callers present an identity-provider bearer token on every request. The
//! verified email is the tenant key: records are only ever listed, read, or
//! changed by the account that created them, and numeric record ids leave
//! the service only in opaque form.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
