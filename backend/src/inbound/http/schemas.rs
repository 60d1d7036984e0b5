//! OpenAPI schema definitions for types that do not derive `ToSchema`.
//!
//! Domain types stay framework-agnostic, and the generic [`Envelope`] cannot
//! be named per payload, so the wrappers here mirror their JSON shape for
//! documentation only.
//!
//! [`Envelope`]: super::envelope::Envelope

use utoipa::ToSchema;

use super::envelope::Meta;
use super::medical_records::MedicalRecordView;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Internal server error.
    #[schema(rename = "01-001")]
    Internal,
    /// Unauthorized.
    #[schema(rename = "02-001")]
    Unauthorized,
    /// User is empty.
    #[schema(rename = "03-001")]
    EmptyUser,
    /// Medical record is empty.
    #[schema(rename = "04-001")]
    EmptyMedicalRecord,
    /// Symptom, diagnosis, and therapy must not be empty.
    #[schema(rename = "04-002")]
    InvalidMedicalRecordAttribute,
    /// Medical record request body is malformed.
    #[schema(rename = "04-003")]
    InvalidMedicalRecordRequest,
    /// Content-Type must be application/json.
    #[schema(rename = "05-001")]
    WrongContentType,
    /// ID is invalid.
    #[schema(rename = "05-002")]
    InvalidId,
    /// Query parameter is invalid.
    #[schema(rename = "05-003")]
    InvalidParam,
}

/// Success body carrying one record.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MedicalRecordEnvelopeSchema {
    data: MedicalRecordView,
    meta: Meta,
}

/// Success body carrying a page of records.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MedicalRecordListEnvelopeSchema {
    data: Vec<MedicalRecordView>,
    meta: Meta,
}

/// Success body of writes: `{"data": null, "meta": {}}`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmptyEnvelopeSchema {
    #[schema(value_type = Option<Object>)]
    data: Option<()>,
    meta: Meta,
}
