//! Medical record API handlers.
//!
//! ```text
//! POST /medical-records      {"symptom":"..","diagnosis":"..","therapy":".."}
//! GET  /medical-records?from=<opaque id>
//! GET  /medical-records/{id}
//! PUT  /medical-records/{id} {"symptom":"..","diagnosis":"..","therapy":".."}
//! ```
//!
//! Every route requires a bearer token and only ever touches records owned
//! by the caller's email.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateMedicalRecordRequest, UpdateMedicalRecordRequest};
use crate::domain::{MedicalRecord, RecordDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{Envelope, ErrorEnvelope};
use crate::inbound::http::ids;
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, MedicalRecordEnvelopeSchema, MedicalRecordListEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use opaque_id::OpaqueIdCodec;

/// Body of create and update requests.
///
/// Missing fields decode as empty strings so they fail content validation
/// rather than body decoding.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MedicalRecordRequest {
    #[serde(default)]
    #[schema(example = "persistent cough")]
    pub symptom: String,
    #[serde(default)]
    #[schema(example = "bronchitis")]
    pub diagnosis: String,
    #[serde(default)]
    #[schema(example = "rest and fluids")]
    pub therapy: String,
}

impl From<MedicalRecordRequest> for RecordDraft {
    fn from(value: MedicalRecordRequest) -> Self {
        Self {
            symptom: value.symptom,
            diagnosis: value.diagnosis,
            therapy: value.therapy,
        }
    }
}

/// Client view of a stored record. The numeric id never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MedicalRecordView {
    #[schema(example = "gY3kqPzW0b")]
    pub id: String,
    pub symptom: String,
    pub diagnosis: String,
    pub therapy: String,
    pub result: String,
    #[schema(example = "ada@example.com")]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[schema(example = "ada@example.com")]
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecordView {
    fn from_record(codec: &OpaqueIdCodec, record: &MedicalRecord) -> ApiResult<Self> {
        let content = record.content();
        let audit = record.audit();
        Ok(Self {
            id: ids::opaque(codec, record.id())?,
            symptom: content.symptom().to_owned(),
            diagnosis: content.diagnosis().to_owned(),
            therapy: content.therapy().to_owned(),
            result: record.result().to_owned(),
            created_by: audit.created_by.to_string(),
            created_at: audit.created_at,
            updated_by: audit.updated_by.to_string(),
            updated_at: audit.updated_at,
        })
    }
}

/// Query string of the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMedicalRecordsQuery {
    /// Opaque id of the last record already seen. Omit for the first page.
    pub from: Option<String>,
}

/// Create a record owned by the caller.
#[utoipa::path(
    post,
    path = "/medical-records",
    request_body = MedicalRecordRequest,
    responses(
        (status = 201, description = "Record created", body = EmptyEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["medical-records"],
    operation_id = "createMedicalRecord",
    security(("bearer" = []))
)]
#[post("/medical-records")]
pub async fn create_medical_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<Option<MedicalRecordRequest>>,
) -> ApiResult<HttpResponse> {
    let request = CreateMedicalRecordRequest {
        owner: user.into_inner().email().clone(),
        draft: payload.into_inner().map(RecordDraft::from),
    };
    state.records.create(request).await?;
    Ok(HttpResponse::Created().json(Envelope::empty()))
}

/// List the caller's records, newest first.
#[utoipa::path(
    get,
    path = "/medical-records",
    params(ListMedicalRecordsQuery),
    responses(
        (status = 200, description = "Records", body = MedicalRecordListEnvelopeSchema),
        (status = 400, description = "Invalid cursor", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["medical-records"],
    operation_id = "listMedicalRecords",
    security(("bearer" = []))
)]
#[get("/medical-records")]
pub async fn list_medical_records(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<ListMedicalRecordsQuery>,
) -> ApiResult<HttpResponse> {
    let cursor = ids::cursor(&state.ids, query.from.as_deref())?;
    let records = state
        .records_query
        .find_by_email(user.user().email(), cursor)
        .await?;
    let views = records
        .iter()
        .map(|record| MedicalRecordView::from_record(&state.ids, record))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(Envelope::data(views)))
}

/// Fetch one of the caller's records.
#[utoipa::path(
    get,
    path = "/medical-records/{id}",
    params(("id" = String, Path, description = "Opaque record id")),
    responses(
        (status = 200, description = "Record", body = MedicalRecordEnvelopeSchema),
        (status = 400, description = "Invalid id", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised or not the owner", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["medical-records"],
    operation_id = "getMedicalRecord",
    security(("bearer" = []))
)]
#[get("/medical-records/{id}")]
pub async fn get_medical_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ids::record_id(&state.ids, &path)?;
    let record = state.records_query.find_by_id(id, user.user().email()).await?;
    let view = MedicalRecordView::from_record(&state.ids, &record)?;
    Ok(HttpResponse::Ok().json(Envelope::data(view)))
}

/// Replace the content of one of the caller's records.
#[utoipa::path(
    put,
    path = "/medical-records/{id}",
    params(("id" = String, Path, description = "Opaque record id")),
    request_body = MedicalRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = EmptyEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised or not the owner", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["medical-records"],
    operation_id = "updateMedicalRecord",
    security(("bearer" = []))
)]
#[put("/medical-records/{id}")]
pub async fn update_medical_record(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<Option<MedicalRecordRequest>>,
) -> ApiResult<HttpResponse> {
    let id = ids::record_id(&state.ids, &path)?;
    let request = UpdateMedicalRecordRequest {
        id,
        caller: user.into_inner().email().clone(),
        draft: payload.into_inner().map(RecordDraft::from),
    };
    state.records.update(request).await?;
    Ok(HttpResponse::Ok().json(Envelope::empty()))
}

#[cfg(test)]
#[path = "medical_records_tests.rs"]
mod tests;
