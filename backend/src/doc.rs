//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the envelope and record schemas,
//! and the bearer security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for external tooling.

use crate::inbound::http::envelope::{ErrorBody, ErrorEnvelope, Meta};
use crate::inbound::http::medical_records::{MedicalRecordRequest, MedicalRecordView};
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, ErrorCodeSchema, MedicalRecordEnvelopeSchema,
    MedicalRecordListEnvelopeSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by every operation.
pub const BEARER_SCHEME: &str = "bearer";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Identity token issued by the identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Medical record service API",
        description = "Tenant-scoped medical records behind bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::sign_in::sign_in,
        crate::inbound::http::medical_records::create_medical_record,
        crate::inbound::http::medical_records::list_medical_records,
        crate::inbound::http::medical_records::get_medical_record,
        crate::inbound::http::medical_records::update_medical_record,
    ),
    components(schemas(
        ErrorCodeSchema,
        ErrorBody,
        ErrorEnvelope,
        Meta,
        MedicalRecordRequest,
        MedicalRecordView,
        MedicalRecordEnvelopeSchema,
        MedicalRecordListEnvelopeSchema,
        EmptyEnvelopeSchema,
    )),
    tags(
        (name = "users", description = "Identity sign-in"),
        (name = "medical-records", description = "Caller-owned medical records")
    )
)]
pub struct ApiDoc;
