//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use opaque_id::OpaqueIdCodec;

use crate::domain::ports::{
    IdentityResolver, MedicalRecordCommand, MedicalRecordQuery, SignInCommand,
};

/// Dependency bundle for HTTP handlers and the bearer middleware.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityResolver>,
    pub sign_in: Arc<dyn SignInCommand>,
    pub records: Arc<dyn MedicalRecordCommand>,
    pub records_query: Arc<dyn MedicalRecordQuery>,
    pub ids: Arc<OpaqueIdCodec>,
}
