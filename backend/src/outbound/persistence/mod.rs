//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Stores translate between Diesel row structs and domain types and hold no
//! business rules. Row models (`models.rs`) and the schema (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven through
//! `diesel-async`, and every database failure is mapped to the owning port's
//! error type.
//!
//! # Example
//!
//! ```ignore
//! use record_service::outbound::persistence::{DbPool, DieselMedicalRecordStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/records")).await?;
//! let store = DieselMedicalRecordStore::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_medical_record_store;
mod diesel_user_store;
mod listing;
mod models;
mod pool;
mod schema;

pub use diesel_medical_record_store::DieselMedicalRecordStore;
pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, PoolConfig, PoolError};
