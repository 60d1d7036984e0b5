//! Driving port for medical record reads.

use async_trait::async_trait;

use crate::domain::{Email, Error, MedicalRecord, RecordCursor, RecordId};

/// Ownership-checked read workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalRecordQuery: Send + Sync {
    /// Fetch a single record the caller owns.
    async fn find_by_id(&self, id: RecordId, caller: &Email) -> Result<MedicalRecord, Error>;

    /// List the caller's records below `cursor`, newest first.
    async fn find_by_email(
        &self,
        owner: &Email,
        cursor: RecordCursor,
    ) -> Result<Vec<MedicalRecord>, Error>;
}
