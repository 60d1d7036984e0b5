//! Row-tolerant collection of medical record listings.
//!
//! A row that cannot be decoded, or whose values fail domain validation, is
//! logged and skipped. Any other stream error fails the whole listing and
//! discards the rows collected so far: a partial page must never be returned
//! as if it were complete.

use diesel::result::{Error as DieselError, QueryResult};
use futures_util::{Stream, StreamExt};
use tracing::{error, warn};

use crate::domain::ports::MedicalRecordStoreError;
use crate::domain::{AuditStamp, Email, MedicalRecord, RecordContent, RecordId};

use super::diesel_error_mapping::map_diesel_error;
use super::models::MedicalRecordRow;

/// Convert a stored row into a validated domain record.
pub(crate) fn row_to_record(
    row: MedicalRecordRow,
) -> Result<MedicalRecord, MedicalRecordStoreError> {
    let MedicalRecordRow {
        id,
        email,
        symptom,
        diagnosis,
        therapy,
        result,
        created_at,
        created_by,
        updated_at,
        updated_by,
    } = row;

    let invalid = |field: &str, reason: String| {
        MedicalRecordStoreError::query(format!("row {id} has invalid {field}: {reason}"))
    };

    let record_id = RecordId::try_from(id).map_err(|err| invalid("id", err.to_string()))?;
    let owner = Email::parse(&email).map_err(|err| invalid("email", err.to_string()))?;
    let content = RecordContent::new(&symptom, &diagnosis, &therapy)
        .map_err(|err| invalid("content", err.to_string()))?;
    let audit = AuditStamp {
        created_at,
        created_by: Email::parse(&created_by)
            .map_err(|err| invalid("created_by", err.to_string()))?,
        updated_at,
        updated_by: Email::parse(&updated_by)
            .map_err(|err| invalid("updated_by", err.to_string()))?,
    };

    Ok(MedicalRecord::new(record_id, owner, content, result, audit))
}

/// Drain `rows`, skipping unreadable rows and failing on stream errors.
pub(crate) async fn collect_listing<S>(
    rows: S,
) -> Result<Vec<MedicalRecord>, MedicalRecordStoreError>
where
    S: Stream<Item = QueryResult<MedicalRecordRow>>,
{
    let mut rows = std::pin::pin!(rows);
    let mut records = Vec::new();
    let mut skipped = 0_usize;

    while let Some(item) = rows.next().await {
        match item {
            Ok(row) => match row_to_record(row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    skipped += 1;
                    warn!(%reason, "skipping medical record row that fails validation");
                }
            },
            Err(DieselError::DeserializationError(reason)) => {
                skipped += 1;
                warn!(%reason, "skipping medical record row that failed to decode");
            }
            Err(other) => {
                error!(
                    error = %other,
                    discarded = records.len(),
                    "medical record listing failed mid-stream"
                );
                return Err(map_diesel_error(
                    other,
                    "list medical records",
                    MedicalRecordStoreError::query,
                    MedicalRecordStoreError::connection,
                ));
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, returned = records.len(), "medical record listing skipped rows");
    }
    Ok(records)
}
