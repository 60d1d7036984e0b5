//! Medical record entities and their identifiers.
//!
//! Records are owned by exactly one tenant, identified by email. Content is
//! validated before it reaches storage: symptom, diagnosis, and therapy must
//! be non-empty once surrounding whitespace is trimmed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::Email;

/// Errors raised when constructing a [`RecordId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordIdError {
    /// Zero is never assigned by the store.
    #[error("record id must be positive")]
    Zero,
    /// The store's signed column cannot hold the value.
    #[error("record id {0} exceeds the signed 64-bit range")]
    OutOfRange(u64),
}

/// Store-assigned numeric identifier, always in `1..=i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    /// Validate an unsigned identifier, typically one decoded from an opaque
    /// string.
    pub fn new(raw: u64) -> Result<Self, RecordIdError> {
        match i64::try_from(raw) {
            Ok(0) => Err(RecordIdError::Zero),
            Ok(value) => Ok(Self(value)),
            Err(_) => Err(RecordIdError::OutOfRange(raw)),
        }
    }

    /// Unsigned form, as fed to the opaque identifier codec.
    pub const fn get(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Signed form, as stored in the database.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(RecordIdError::Zero);
        }
        Ok(Self(value))
    }
}

/// Exclusive upper bound for listing, expressed as a record id.
///
/// Listing returns rows whose id is strictly below the cursor. The absence
/// of a cursor maps to [`RecordCursor::newest`], the signed ceiling, so a
/// first page covers everything. The codec's unsigned range must never be
/// used here.
///
/// # Examples
/// ```
/// use record_service::domain::{RecordCursor, RecordId};
///
/// assert_eq!(RecordCursor::newest().as_i64(), i64::MAX);
/// let id = RecordId::new(3).expect("valid id");
/// assert_eq!(RecordCursor::before(id).as_i64(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCursor(i64);

impl RecordCursor {
    /// Start from the newest possible record.
    pub const fn newest() -> Self {
        Self(i64::MAX)
    }

    /// Continue below a previously seen record.
    pub const fn before(id: RecordId) -> Self {
        Self(id.as_i64())
    }

    /// Bound used in the `id < $cursor` predicate.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl Default for RecordCursor {
    fn default() -> Self {
        Self::newest()
    }
}

/// Raw, untrimmed content supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    /// Reported symptom.
    pub symptom: String,
    /// Clinical diagnosis.
    pub diagnosis: String,
    /// Prescribed therapy.
    pub therapy: String,
}

/// Content validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordContentError {
    /// Symptom was blank.
    #[error("symptom must not be empty")]
    EmptySymptom,
    /// Diagnosis was blank.
    #[error("diagnosis must not be empty")]
    EmptyDiagnosis,
    /// Therapy was blank.
    #[error("therapy must not be empty")]
    EmptyTherapy,
}

/// Trimmed, validated record content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContent {
    symptom: String,
    diagnosis: String,
    therapy: String,
}

fn required(value: &str, missing: RecordContentError) -> Result<String, RecordContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(missing)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl RecordContent {
    /// Trim and validate the three free-text fields.
    pub fn new(symptom: &str, diagnosis: &str, therapy: &str) -> Result<Self, RecordContentError> {
        Ok(Self {
            symptom: required(symptom, RecordContentError::EmptySymptom)?,
            diagnosis: required(diagnosis, RecordContentError::EmptyDiagnosis)?,
            therapy: required(therapy, RecordContentError::EmptyTherapy)?,
        })
    }

    /// Trimmed symptom.
    pub fn symptom(&self) -> &str {
        &self.symptom
    }

    /// Trimmed diagnosis.
    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    /// Trimmed therapy.
    pub fn therapy(&self) -> &str {
        &self.therapy
    }
}

impl TryFrom<&RecordDraft> for RecordContent {
    type Error = RecordContentError;

    fn try_from(draft: &RecordDraft) -> Result<Self, Self::Error> {
        Self::new(&draft.symptom, &draft.diagnosis, &draft.therapy)
    }
}

/// Creation and last-update actors and times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Who created the record.
    pub created_by: Email,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
    /// Who last changed the record.
    pub updated_by: Email,
}

impl AuditStamp {
    /// Stamp for a record created and last touched by `actor` at `at`.
    pub fn created(actor: &Email, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            created_by: actor.clone(),
            updated_at: at,
            updated_by: actor.clone(),
        }
    }
}

/// A validated record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicalRecord {
    owner: Email,
    content: RecordContent,
    result: String,
    audit: AuditStamp,
}

impl NewMedicalRecord {
    /// Build a record owned and created by `owner`. The result starts empty.
    pub fn new(owner: Email, content: RecordContent, created_at: DateTime<Utc>) -> Self {
        let audit = AuditStamp::created(&owner, created_at);
        Self {
            owner,
            content,
            result: String::new(),
            audit,
        }
    }

    /// Owning tenant.
    pub fn owner(&self) -> &Email {
        &self.owner
    }

    /// Validated content.
    pub fn content(&self) -> &RecordContent {
        &self.content
    }

    /// Outcome text.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Audit stamp.
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }

    /// Attach the store-assigned identifier.
    pub fn into_record(self, id: RecordId) -> MedicalRecord {
        MedicalRecord {
            id,
            owner: self.owner,
            content: self.content,
            result: self.result,
            audit: self.audit,
        }
    }
}

/// A stored medical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalRecord {
    id: RecordId,
    owner: Email,
    content: RecordContent,
    result: String,
    audit: AuditStamp,
}

impl MedicalRecord {
    /// Rehydrate a stored record.
    pub fn new(
        id: RecordId,
        owner: Email,
        content: RecordContent,
        result: impl Into<String>,
        audit: AuditStamp,
    ) -> Self {
        Self {
            id,
            owner,
            content,
            result: result.into(),
            audit,
        }
    }

    /// Store-assigned identifier.
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Owning tenant.
    pub fn owner(&self) -> &Email {
        &self.owner
    }

    /// Whether `caller` owns this record.
    pub fn is_owned_by(&self, caller: &Email) -> bool {
        &self.owner == caller
    }

    /// Validated content.
    pub fn content(&self) -> &RecordContent {
        &self.content
    }

    /// Outcome text.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Audit stamp.
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }
}

/// Mutation applied by the update workflow.
///
/// `result` is `None` when the outcome text must be left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanges {
    /// Replacement content.
    pub content: RecordContent,
    /// Replacement outcome text, if any.
    pub result: Option<String>,
    /// Time of the change.
    pub updated_at: DateTime<Utc>,
    /// Caller performing the change.
    pub updated_by: Email,
}
