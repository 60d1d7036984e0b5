//! Driving port for medical record mutations.

use async_trait::async_trait;

use crate::domain::{Email, Error, MedicalRecord, RecordDraft, RecordId};

/// Request to create a record owned by the caller.
///
/// `draft` is `None` when the client supplied no payload at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMedicalRecordRequest {
    pub owner: Email,
    pub draft: Option<RecordDraft>,
}

/// Request to replace the content of a record the caller owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMedicalRecordRequest {
    pub id: RecordId,
    pub caller: Email,
    pub draft: Option<RecordDraft>,
}

/// Create and update workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalRecordCommand: Send + Sync {
    /// Validate and store a new record.
    async fn create(&self, request: CreateMedicalRecordRequest) -> Result<MedicalRecord, Error>;

    /// Validate and apply changes after proving ownership.
    async fn update(&self, request: UpdateMedicalRecordRequest) -> Result<(), Error>;
}
