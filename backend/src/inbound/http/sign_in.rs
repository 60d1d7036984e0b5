//! Sign-in handler.
//!
//! ```text
//! POST /sign-in
//! ```

use actix_web::{HttpResponse, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{Envelope, ErrorEnvelope};
use crate::inbound::http::schemas::EmptyEnvelopeSchema;
use crate::inbound::http::state::HttpState;

/// Record the caller's verified identity. Safe to repeat.
#[utoipa::path(
    post,
    path = "/sign-in",
    responses(
        (status = 201, description = "Signed in", body = EmptyEnvelopeSchema),
        (status = 400, description = "Identity lacks required fields", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "signIn",
    security(("bearer" = []))
)]
#[post("/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.sign_in.sign_in(user.user()).await?;
    Ok(HttpResponse::Created().json(Envelope::empty()))
}
