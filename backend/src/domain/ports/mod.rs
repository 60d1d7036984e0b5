//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`MedicalRecordStore`, `UserStore`, `IdentityResolver`) are
//! implemented by outbound adapters. Driving ports (`MedicalRecordCommand`,
//! `MedicalRecordQuery`, `SignInCommand`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod medical_record_command;
mod medical_record_query;
mod medical_record_store;
mod sign_in_command;
mod user_store;

pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
#[cfg(test)]
pub use medical_record_command::MockMedicalRecordCommand;
pub use medical_record_command::{
    CreateMedicalRecordRequest, MedicalRecordCommand, UpdateMedicalRecordRequest,
};
pub use medical_record_query::MedicalRecordQuery;
#[cfg(test)]
pub use medical_record_query::MockMedicalRecordQuery;
#[cfg(test)]
pub use medical_record_store::MockMedicalRecordStore;
pub use medical_record_store::{MedicalRecordStore, MedicalRecordStoreError};
#[cfg(test)]
pub use sign_in_command::MockSignInCommand;
pub use sign_in_command::SignInCommand;
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
