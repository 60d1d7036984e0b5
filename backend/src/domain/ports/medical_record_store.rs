//! Port for tenant-scoped medical record persistence.

use async_trait::async_trait;

use crate::domain::{Email, MedicalRecord, NewMedicalRecord, RecordChanges, RecordCursor, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by medical record store adapters.
    pub enum MedicalRecordStoreError {
        /// A connection could not be obtained.
        Connection { message: String } =>
            "medical record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "medical record store query failed: {message}",
        /// The operation did not finish within its deadline.
        Timeout { operation: String } =>
            "medical record store timed out during {operation}",
    }
}

/// Port for reading and writing medical records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalRecordStore: Send + Sync {
    /// Persist a validated record and return its assigned identifier.
    async fn insert(&self, record: &NewMedicalRecord) -> Result<RecordId, MedicalRecordStoreError>;

    /// Fetch a record by identifier regardless of owner.
    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<MedicalRecord>, MedicalRecordStoreError>;

    /// List records owned by `owner` with ids strictly below `cursor`,
    /// newest first, at most `limit` entries.
    async fn find_by_email(
        &self,
        owner: &Email,
        cursor: RecordCursor,
        limit: u32,
    ) -> Result<Vec<MedicalRecord>, MedicalRecordStoreError>;

    /// Whether a record with `id` exists and is owned by `owner`.
    async fn record_exists(
        &self,
        id: RecordId,
        owner: &Email,
    ) -> Result<bool, MedicalRecordStoreError>;

    /// Apply `changes` to the record with `id`.
    async fn update(
        &self,
        id: RecordId,
        changes: &RecordChanges,
    ) -> Result<(), MedicalRecordStoreError>;
}
