//! Tests for the medical record workflows.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::AuditStamp;
use crate::domain::ports::MockMedicalRecordStore;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn email(value: &str) -> Email {
    Email::parse(value).expect("valid email")
}

fn record_id(value: u64) -> RecordId {
    RecordId::new(value).expect("valid id")
}

fn draft(symptom: &str, diagnosis: &str, therapy: &str) -> RecordDraft {
    RecordDraft {
        symptom: symptom.to_owned(),
        diagnosis: diagnosis.to_owned(),
        therapy: therapy.to_owned(),
    }
}

fn stored_record(id: u64, owner: &str) -> MedicalRecord {
    let owner_email = email(owner);
    MedicalRecord::new(
        record_id(id),
        owner_email.clone(),
        RecordContent::new("cough", "cold", "rest").expect("content"),
        "",
        AuditStamp::created(&owner_email, fixture_timestamp()),
    )
}

#[fixture]
fn owner() -> Email {
    email("a@x.com")
}

#[rstest]
#[tokio::test]
async fn create_stores_trimmed_content_and_returns_assigned_id(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_insert()
        .times(1)
        .withf(|record| {
            record.content().symptom() == "cough"
                && record.owner().as_str() == "a@x.com"
                && record.audit().created_by.as_str() == "a@x.com"
        })
        .return_once(|_| Ok(RecordId::new(41).expect("valid id")));

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let record = service
        .create(CreateMedicalRecordRequest {
            owner: owner.clone(),
            draft: Some(draft("  cough ", "cold", " rest")),
        })
        .await
        .expect("create succeeds");

    assert_eq!(record.id().get(), 41);
    assert!(record.is_owned_by(&owner));
    assert_eq!(record.content().therapy(), "rest");
    assert_eq!(record.audit().created_at, fixture_timestamp());
    assert_eq!(record.audit().updated_by, owner);
}

#[rstest]
#[case("", "d", "t")]
#[case("   ", "d", "t")]
#[case("s", "", "t")]
#[case("s", "\t\n", "t")]
#[case("s", "d", "")]
#[case("s", "d", "  ")]
#[tokio::test]
async fn create_rejects_blank_fields_without_touching_the_store(
    owner: Email,
    #[case] symptom: &str,
    #[case] diagnosis: &str,
    #[case] therapy: &str,
) {
    let mut store = MockMedicalRecordStore::new();
    store.expect_insert().times(0);

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .create(CreateMedicalRecordRequest {
            owner,
            draft: Some(draft(symptom, diagnosis, therapy)),
        })
        .await
        .expect_err("blank content rejected");

    assert_eq!(err.code(), ErrorCode::InvalidMedicalRecordAttribute);
}

#[rstest]
#[tokio::test]
async fn create_rejects_missing_payload(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store.expect_insert().times(0);

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .create(CreateMedicalRecordRequest { owner, draft: None })
        .await
        .expect_err("missing payload rejected");

    assert_eq!(err.code(), ErrorCode::EmptyMedicalRecord);
}

#[rstest]
#[tokio::test]
async fn create_maps_store_failures_to_internal(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_insert()
        .times(1)
        .return_once(|_| Err(MedicalRecordStoreError::query("duplicate key")));

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .create(CreateMedicalRecordRequest {
            owner,
            draft: Some(draft("s", "d", "t")),
        })
        .await
        .expect_err("store failure surfaces");

    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(err.detail().is_some_and(|detail| detail.contains("duplicate key")));
}

#[rstest]
#[tokio::test]
async fn update_of_unowned_record_never_issues_the_update(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_record_exists()
        .times(1)
        .withf(|id, caller| id.get() == 9 && caller.as_str() == "a@x.com")
        .return_once(|_, _| Ok(false));
    store.expect_update().times(0);

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .update(UpdateMedicalRecordRequest {
            id: record_id(9),
            caller: owner,
            draft: Some(draft("s", "d", "t")),
        })
        .await
        .expect_err("ownership check fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn update_applies_changes_as_the_caller(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_record_exists()
        .times(1)
        .return_once(|_, _| Ok(true));
    store
        .expect_update()
        .times(1)
        .withf(|id, changes| {
            id.get() == 9
                && changes.content.diagnosis() == "flu"
                && changes.result.is_none()
                && changes.updated_by.as_str() == "a@x.com"
                && changes.updated_at == fixture_timestamp()
        })
        .return_once(|_, _| Ok(()));

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    service
        .update(UpdateMedicalRecordRequest {
            id: record_id(9),
            caller: owner,
            draft: Some(draft("fever", " flu ", "fluids")),
        })
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_validates_before_checking_ownership(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store.expect_record_exists().times(0);
    store.expect_update().times(0);

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .update(UpdateMedicalRecordRequest {
            id: record_id(9),
            caller: owner,
            draft: Some(draft("s", "", "t")),
        })
        .await
        .expect_err("invalid content rejected");

    assert_eq!(err.code(), ErrorCode::InvalidMedicalRecordAttribute);
}

#[rstest]
#[tokio::test]
async fn update_maps_existence_check_failures_to_internal(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_record_exists()
        .times(1)
        .return_once(|_, _| Err(MedicalRecordStoreError::connection("refused")));
    store.expect_update().times(0);

    let service = MedicalRecordCommandService::new(Arc::new(store), fixture_clock());
    let err = service
        .update(UpdateMedicalRecordRequest {
            id: record_id(9),
            caller: owner,
            draft: Some(draft("s", "d", "t")),
        })
        .await
        .expect_err("store failure surfaces");

    assert_eq!(err.code(), ErrorCode::Internal);
}

#[rstest]
#[tokio::test]
async fn find_by_id_returns_records_the_caller_owns(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(stored_record(3, "a@x.com"))));

    let service = MedicalRecordQueryService::new(Arc::new(store));
    let record = service
        .find_by_id(record_id(3), &owner)
        .await
        .expect("owner can read");

    assert_eq!(record.id().get(), 3);
}

#[rstest]
#[case::owned_by_someone_else(Some(stored_record(3, "a@x.com")))]
#[case::missing(None)]
#[tokio::test]
async fn find_by_id_does_not_disclose_foreign_or_missing_records(
    #[case] stored: Option<MedicalRecord>,
) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(stored));

    let service = MedicalRecordQueryService::new(Arc::new(store));
    let err = service
        .find_by_id(record_id(3), &email("b@x.com"))
        .await
        .expect_err("access denied");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn find_by_id_distinguishes_storage_failures(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Err(MedicalRecordStoreError::timeout("find medical record")));

    let service = MedicalRecordQueryService::new(Arc::new(store));
    let err = service
        .find_by_id(record_id(3), &owner)
        .await
        .expect_err("storage failure");

    assert_eq!(err.code(), ErrorCode::Internal);
}

#[rstest]
#[tokio::test]
async fn find_by_email_forwards_cursor_and_page_size(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_find_by_email()
        .times(1)
        .withf(|owner, cursor, limit| {
            owner.as_str() == "a@x.com" && cursor.as_i64() == 3 && *limit == 25
        })
        .return_once(|_, _, _| Ok(vec![stored_record(2, "a@x.com"), stored_record(1, "a@x.com")]));

    let service = MedicalRecordQueryService::new(Arc::new(store)).with_page_size(25);
    let records = service
        .find_by_email(&owner, RecordCursor::before(record_id(3)))
        .await
        .expect("listing succeeds");

    let ids: Vec<u64> = records.iter().map(|record| record.id().get()).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[rstest]
#[tokio::test]
async fn find_by_email_uses_the_default_page_size(owner: Email) {
    let mut store = MockMedicalRecordStore::new();
    store
        .expect_find_by_email()
        .times(1)
        .withf(|_, cursor, limit| *cursor == RecordCursor::newest() && *limit == DEFAULT_PAGE_SIZE)
        .return_once(|_, _, _| Ok(Vec::new()));

    let service = MedicalRecordQueryService::new(Arc::new(store));
    let records = service
        .find_by_email(&owner, RecordCursor::default())
        .await
        .expect("listing succeeds");

    assert!(records.is_empty());
}
