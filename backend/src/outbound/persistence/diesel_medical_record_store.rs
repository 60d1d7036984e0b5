//! PostgreSQL-backed `MedicalRecordStore` using Diesel.
//!
//! Every operation runs under the pool's query deadline. Dropping the
//! returned future (client disconnect, shutdown) drops the in-flight query
//! with it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MedicalRecordStore, MedicalRecordStoreError};
use crate::domain::{Email, MedicalRecord, NewMedicalRecord, RecordChanges, RecordCursor, RecordId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::listing::{collect_listing, row_to_record};
use super::models::{MedicalRecordChangeset, MedicalRecordRow, NewMedicalRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::medical_records;

/// Diesel-backed implementation of the medical record store port.
#[derive(Clone)]
pub struct DieselMedicalRecordStore {
    pool: DbPool,
    query_timeout: Duration,
}

impl DieselMedicalRecordStore {
    /// Create a store over `pool`, using the pool's query deadline.
    pub fn new(pool: DbPool) -> Self {
        let query_timeout = pool.query_timeout();
        Self {
            pool,
            query_timeout,
        }
    }

    async fn within<T, F>(
        &self,
        operation: &'static str,
        work: F,
    ) -> Result<T, MedicalRecordStoreError>
    where
        F: Future<Output = Result<T, MedicalRecordStoreError>>,
    {
        tokio::time::timeout(self.query_timeout, work)
            .await
            .map_err(|_| MedicalRecordStoreError::timeout(operation))?
    }
}

fn pool_error(error: PoolError) -> MedicalRecordStoreError {
    map_pool_error(error, MedicalRecordStoreError::connection)
}

fn diesel_error(error: diesel::result::Error, operation: &str) -> MedicalRecordStoreError {
    map_diesel_error(
        error,
        operation,
        MedicalRecordStoreError::query,
        MedicalRecordStoreError::connection,
    )
}

#[async_trait]
impl MedicalRecordStore for DieselMedicalRecordStore {
    async fn insert(&self, record: &NewMedicalRecord) -> Result<RecordId, MedicalRecordStoreError> {
        const OPERATION: &str = "insert medical record";
        self.within(OPERATION, async {
            let mut conn = self.pool.get().await.map_err(pool_error)?;
            let content = record.content();
            let audit = record.audit();
            let row = NewMedicalRecordRow {
                email: record.owner().as_str(),
                symptom: content.symptom(),
                diagnosis: content.diagnosis(),
                therapy: content.therapy(),
                result: record.result(),
                created_at: audit.created_at,
                created_by: audit.created_by.as_str(),
                updated_at: audit.updated_at,
                updated_by: audit.updated_by.as_str(),
            };

            let id: i64 = diesel::insert_into(medical_records::table)
                .values(&row)
                .returning(medical_records::id)
                .get_result(&mut conn)
                .await
                .map_err(|err| diesel_error(err, OPERATION))?;

            RecordId::try_from(id).map_err(|err| {
                MedicalRecordStoreError::query(format!("{OPERATION}: database returned {err}"))
            })
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<MedicalRecord>, MedicalRecordStoreError> {
        const OPERATION: &str = "find medical record";
        self.within(OPERATION, async {
            let mut conn = self.pool.get().await.map_err(pool_error)?;
            let row = medical_records::table
                .filter(medical_records::id.eq(id.as_i64()))
                .select(MedicalRecordRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| diesel_error(err, OPERATION))?;

            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        owner: &Email,
        cursor: RecordCursor,
        limit: u32,
    ) -> Result<Vec<MedicalRecord>, MedicalRecordStoreError> {
        const OPERATION: &str = "list medical records";
        self.within(OPERATION, async {
            let mut conn = self.pool.get().await.map_err(pool_error)?;
            let rows = medical_records::table
                .filter(medical_records::email.eq(owner.as_str()))
                .filter(medical_records::id.lt(cursor.as_i64()))
                .order((
                    medical_records::created_at.desc(),
                    medical_records::id.desc(),
                ))
                .limit(i64::from(limit))
                .select(MedicalRecordRow::as_select())
                .load_stream::<MedicalRecordRow>(&mut conn)
                .await
                .map_err(|err| diesel_error(err, OPERATION))?;

            collect_listing(rows).await
        })
        .await
    }

    async fn record_exists(
        &self,
        id: RecordId,
        owner: &Email,
    ) -> Result<bool, MedicalRecordStoreError> {
        const OPERATION: &str = "check medical record ownership";
        self.within(OPERATION, async {
            let mut conn = self.pool.get().await.map_err(pool_error)?;
            let found: Option<i64> = medical_records::table
                .filter(medical_records::id.eq(id.as_i64()))
                .filter(medical_records::email.eq(owner.as_str()))
                .select(medical_records::id)
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| diesel_error(err, OPERATION))?;

            Ok(found.is_some())
        })
        .await
    }

    async fn update(
        &self,
        id: RecordId,
        changes: &RecordChanges,
    ) -> Result<(), MedicalRecordStoreError> {
        const OPERATION: &str = "update medical record";
        self.within(OPERATION, async {
            let mut conn = self.pool.get().await.map_err(pool_error)?;
            let changeset = MedicalRecordChangeset {
                symptom: changes.content.symptom(),
                diagnosis: changes.content.diagnosis(),
                therapy: changes.content.therapy(),
                result: changes.result.as_deref(),
                updated_at: changes.updated_at,
                updated_by: changes.updated_by.as_str(),
            };

            diesel::update(medical_records::table.filter(medical_records::id.eq(id.as_i64())))
                .set(&changeset)
                .execute(&mut conn)
                .await
                .map_err(|err| diesel_error(err, OPERATION))?;
            Ok(())
        })
        .await
    }
}
