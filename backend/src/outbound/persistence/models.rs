//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Stores convert them into
//! validated domain values on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{medical_records, users};

/// Row read from `medical_records`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medical_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicalRecordRow {
    pub id: i64,
    pub email: String,
    pub symptom: String,
    pub diagnosis: String,
    pub therapy: String,
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Insertable medical record; the id is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = medical_records)]
pub(crate) struct NewMedicalRecordRow<'a> {
    pub email: &'a str,
    pub symptom: &'a str,
    pub diagnosis: &'a str,
    pub therapy: &'a str,
    pub result: &'a str,
    pub created_at: DateTime<Utc>,
    pub created_by: &'a str,
    pub updated_at: DateTime<Utc>,
    pub updated_by: &'a str,
}

/// Changeset for the update workflow. A `None` result leaves the column
/// untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = medical_records)]
pub(crate) struct MedicalRecordChangeset<'a> {
    pub symptom: &'a str,
    pub diagnosis: &'a str,
    pub therapy: &'a str,
    pub result: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: &'a str,
}

/// Insertable user for sign-in.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub provider_subject: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields refreshed when a known user signs in again.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserRefresh<'a> {
    pub name: &'a str,
    pub provider_subject: &'a str,
    pub updated_at: DateTime<Utc>,
}
