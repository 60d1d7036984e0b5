//! Tests for the medical record handlers.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::App;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use opaque_id::OpaqueIdCodec;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockIdentityResolver, MockMedicalRecordCommand, MockMedicalRecordQuery, MockSignInCommand,
};
use crate::domain::{
    AuditStamp, Email, Error, ErrorCode, RecordContent, RecordCursor, RecordId, User,
};
use crate::inbound::http::configure;

const SALT: &str = "handler-tests";
const CALLER: &str = "ada@example.com";

fn codec() -> OpaqueIdCodec {
    OpaqueIdCodec::new(SALT, 10).expect("valid codec")
}

fn opaque(id: u64) -> String {
    codec().encode(id).expect("encodes")
}

fn caller() -> Email {
    Email::parse(CALLER).expect("valid email")
}

fn stored(id: u64) -> MedicalRecord {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    MedicalRecord::new(
        RecordId::new(id).expect("valid id"),
        caller(),
        RecordContent::new("cough", "cold", "rest").expect("content"),
        "",
        AuditStamp::created(&caller(), at),
    )
}

#[derive(Default)]
struct Ports {
    records: MockMedicalRecordCommand,
    records_query: MockMedicalRecordQuery,
}

async fn call(ports: Ports, req: actix_test::TestRequest) -> ServiceResponse {
    let mut identity = MockIdentityResolver::new();
    identity
        .expect_resolve()
        .returning(|_| Ok(User::new(caller(), "Ada", "subject-1")));
    let state = HttpState {
        identity: Arc::new(identity),
        sign_in: Arc::new(MockSignInCommand::new()),
        records: Arc::new(ports.records),
        records_query: Arc::new(ports.records_query),
        ids: Arc::new(codec()),
    };
    let app = actix_test::init_service(App::new().configure(configure(state))).await;
    let req = req.insert_header(("Authorization", "Bearer token")).to_request();
    actix_test::call_service(&app, req).await
}

async fn error_code(res: ServiceResponse) -> String {
    let body: Value = actix_test::read_body_json(res).await;
    body["errors"][0]["code"]
        .as_str()
        .expect("error code present")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn create_passes_the_caller_and_draft() {
    let mut ports = Ports::default();
    ports
        .records
        .expect_create()
        .withf(|request: &CreateMedicalRecordRequest| {
            request.owner == caller()
                && request
                    .draft
                    .as_ref()
                    .is_some_and(|draft| draft.symptom == " cough " && draft.therapy == "rest")
        })
        .times(1)
        .return_once(|_| Ok(stored(1)));

    let res = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/medical-records")
            .set_json(json!({"symptom": " cough ", "diagnosis": "cold", "therapy": "rest"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"data": null, "meta": {}}));
}

#[rstest]
#[actix_web::test]
async fn null_bodies_reach_the_workflow_as_missing_drafts() {
    let mut ports = Ports::default();
    ports
        .records
        .expect_create()
        .withf(|request: &CreateMedicalRecordRequest| request.draft.is_none())
        .return_once(|_| Err(Error::new(ErrorCode::EmptyMedicalRecord)));

    let res = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/medical-records")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("null"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "04-001");
}

#[rstest]
#[case(Some("text/plain"), r#"{"symptom":"a"}"#, "05-001")]
#[case(None, r#"{"symptom":"a"}"#, "05-001")]
#[case(Some("application/json"), r#"{"symptom":"#, "04-003")]
#[case(Some("application/json"), r#"{"symptom":42}"#, "04-003")]
#[actix_web::test]
async fn undecodable_bodies_never_reach_the_workflow(
    #[case] content_type: Option<&str>,
    #[case] payload: &'static str,
    #[case] expected: &str,
) {
    let mut ports = Ports::default();
    ports.records.expect_create().times(0);

    let mut req = actix_test::TestRequest::post()
        .uri("/medical-records")
        .set_payload(payload);
    if let Some(value) = content_type {
        req = req.insert_header((CONTENT_TYPE, value));
    }
    let res = call(ports, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, expected);
}

#[rstest]
#[actix_web::test]
async fn listing_without_a_cursor_starts_from_the_newest() {
    let mut ports = Ports::default();
    ports
        .records_query
        .expect_find_by_email()
        .withf(|owner: &Email, cursor: &RecordCursor| {
            owner == &caller() && *cursor == RecordCursor::newest()
        })
        .return_once(|_, _| Ok(vec![stored(2), stored(1)]));

    let res = call(ports, actix_test::TestRequest::get().uri("/medical-records")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .expect("data is a list")
        .iter()
        .filter_map(|view| view["id"].as_str())
        .collect();
    assert_eq!(ids, vec![opaque(2), opaque(1)]);
    assert_eq!(body["data"][0]["created_by"], CALLER);
    assert_eq!(body["data"][0]["created_at"], "2024-05-01T09:30:00Z");
    assert_eq!(body["meta"], json!({}));
}

#[rstest]
#[actix_web::test]
async fn listing_decodes_the_cursor() {
    let mut ports = Ports::default();
    ports
        .records_query
        .expect_find_by_email()
        .withf(|_: &Email, cursor: &RecordCursor| cursor.as_i64() == 3)
        .return_once(|_, _| Ok(Vec::new()));

    let uri = format!("/medical-records?from={}", opaque(3));
    let res = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"data": [], "meta": {}}));
}

#[rstest]
#[actix_web::test]
async fn undecodable_cursors_are_invalid_params() {
    let mut ports = Ports::default();
    ports.records_query.expect_find_by_email().times(0);

    let res = call(
        ports,
        actix_test::TestRequest::get().uri("/medical-records?from=not-an-id"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "05-003");
}

#[rstest]
#[actix_web::test]
async fn fetching_returns_the_view() {
    let mut ports = Ports::default();
    ports
        .records_query
        .expect_find_by_id()
        .withf(|id: &RecordId, owner: &Email| id.get() == 7 && owner == &caller())
        .return_once(|_, _| Ok(stored(7)));

    let uri = format!("/medical-records/{}", opaque(7));
    let res = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"]["id"], opaque(7));
    assert_eq!(body["data"]["symptom"], "cough");
    assert_eq!(body["data"]["result"], "");
}

#[rstest]
#[actix_web::test]
async fn fetching_someone_elses_record_is_unauthorized() {
    let mut ports = Ports::default();
    ports
        .records_query
        .expect_find_by_id()
        .return_once(|_, _| Err(Error::unauthorized("record 7 is not owned by caller")));

    let uri = format!("/medical-records/{}", opaque(7));
    let res = call(ports, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "02-001");
}

#[rstest]
#[case::get(actix_test::TestRequest::get())]
#[case::put(actix_test::TestRequest::put().set_json(json!({"symptom": "a", "diagnosis": "b", "therapy": "c"})))]
#[actix_web::test]
async fn undecodable_path_ids_are_invalid_ids(#[case] req: actix_test::TestRequest) {
    let mut ports = Ports::default();
    ports.records_query.expect_find_by_id().times(0);
    ports.records.expect_update().times(0);

    let res = call(ports, req.uri("/medical-records/zzz")).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "05-002");
}

#[rstest]
#[actix_web::test]
async fn updating_passes_the_decoded_id_and_caller() {
    let mut ports = Ports::default();
    ports
        .records
        .expect_update()
        .withf(|request: &UpdateMedicalRecordRequest| {
            request.id.get() == 7
                && request.caller == caller()
                && request
                    .draft
                    .as_ref()
                    .is_some_and(|draft| draft.diagnosis == "flu")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let uri = format!("/medical-records/{}", opaque(7));
    let res = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"symptom": "fever", "diagnosis": "flu", "therapy": "rest"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"data": null, "meta": {}}));
}
