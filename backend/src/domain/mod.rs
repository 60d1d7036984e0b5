//! Domain primitives, workflows, and ports.
//!
//! Purpose: define the medical record entities, the closed error registry,
//! and the services enforcing validation and ownership. Nothing here knows
//! about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode / ErrorCategory: the error taxonomy.
//! - User / Email: verified identity and tenant key.
//! - MedicalRecord and friends: the owned entity and its identifiers.
//! - MedicalRecordCommandService / MedicalRecordQueryService /
//!   SignInService: driving port implementations.

pub mod error;
pub mod medical_record;
pub mod medical_record_service;
pub mod ports;
pub mod sign_in_service;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCategory, ErrorCode};
pub use self::medical_record::{
    AuditStamp, MedicalRecord, NewMedicalRecord, RecordChanges, RecordContent,
    RecordContentError, RecordCursor, RecordDraft, RecordId, RecordIdError,
};
pub use self::medical_record_service::{
    DEFAULT_PAGE_SIZE, MedicalRecordCommandService, MedicalRecordQueryService,
};
pub use self::sign_in_service::SignInService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, User, UserValidationError};
