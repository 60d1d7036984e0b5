//! Medical record workflows.
//!
//! These services implement the medical record driving ports. They validate
//! input, enforce the ownership invariant, and translate store failures into
//! [`ErrorCode::Internal`]. Reads and updates never reveal whether a record
//! the caller does not own exists: both cases surface as
//! [`ErrorCode::Unauthorized`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateMedicalRecordRequest, MedicalRecordCommand, MedicalRecordQuery, MedicalRecordStore,
    MedicalRecordStoreError, UpdateMedicalRecordRequest,
};
use crate::domain::{
    Email, Error, ErrorCode, MedicalRecord, NewMedicalRecord, RecordChanges, RecordContent,
    RecordCursor, RecordDraft, RecordId,
};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

fn map_store_error(error: MedicalRecordStoreError) -> Error {
    Error::internal(error.to_string())
}

fn validate_draft(draft: Option<&RecordDraft>) -> Result<RecordContent, Error> {
    let draft = draft.ok_or(Error::new(ErrorCode::EmptyMedicalRecord))?;
    RecordContent::try_from(draft).map_err(|err| {
        Error::new(ErrorCode::InvalidMedicalRecordAttribute).wrap(err.to_string())
    })
}

fn not_owned(id: RecordId) -> Error {
    Error::unauthorized(format!(
        "record {} is missing or owned by another user",
        id.get()
    ))
}

/// Service implementing the create and update workflows.
#[derive(Clone)]
pub struct MedicalRecordCommandService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> MedicalRecordCommandService<S> {
    /// Create a command service over `store`, stamping changes with `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl<S> MedicalRecordCommand for MedicalRecordCommandService<S>
where
    S: MedicalRecordStore,
{
    async fn create(&self, request: CreateMedicalRecordRequest) -> Result<MedicalRecord, Error> {
        let content = validate_draft(request.draft.as_ref())?;
        let record = NewMedicalRecord::new(request.owner, content, self.clock.utc());

        let id = self.store.insert(&record).await.map_err(map_store_error)?;
        info!(record_id = id.get(), "medical record created");
        Ok(record.into_record(id))
    }

    async fn update(&self, request: UpdateMedicalRecordRequest) -> Result<(), Error> {
        let UpdateMedicalRecordRequest { id, caller, draft } = request;
        let content = validate_draft(draft.as_ref())?;

        let owned = self
            .store
            .record_exists(id, &caller)
            .await
            .map_err(map_store_error)?;
        if !owned {
            return Err(not_owned(id));
        }

        let changes = RecordChanges {
            content,
            result: None,
            updated_at: self.clock.utc(),
            updated_by: caller,
        };
        self.store
            .update(id, &changes)
            .await
            .map_err(map_store_error)?;
        info!(record_id = id.get(), "medical record updated");
        Ok(())
    }
}

/// Service implementing the read workflows.
#[derive(Clone)]
pub struct MedicalRecordQueryService<S> {
    store: Arc<S>,
    page_size: u32,
}

impl<S> MedicalRecordQueryService<S> {
    /// Create a query service over `store` using [`DEFAULT_PAGE_SIZE`].
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl<S> MedicalRecordQuery for MedicalRecordQueryService<S>
where
    S: MedicalRecordStore,
{
    async fn find_by_id(&self, id: RecordId, caller: &Email) -> Result<MedicalRecord, Error> {
        match self.store.find_by_id(id).await.map_err(map_store_error)? {
            Some(record) if record.is_owned_by(caller) => Ok(record),
            Some(_) => {
                debug!(record_id = id.get(), "record owned by another user");
                Err(not_owned(id))
            }
            None => {
                debug!(record_id = id.get(), "record not found");
                Err(not_owned(id))
            }
        }
    }

    async fn find_by_email(
        &self,
        owner: &Email,
        cursor: RecordCursor,
    ) -> Result<Vec<MedicalRecord>, Error> {
        self.store
            .find_by_email(owner, cursor, self.page_size)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "medical_record_service_tests.rs"]
mod tests;
