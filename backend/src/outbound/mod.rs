//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL stores built on Diesel
//! - **identity**: bearer-token verification against the identity provider
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod identity;
pub mod persistence;
