//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers render failures as the shared error envelope. The status is
//! decided by category alone: internal failures are 500, identity and
//! ownership failures 401, and everything else 400.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCategory, ErrorCode, TraceId};

use super::envelope::ErrorEnvelope;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
    }
}

fn log_rendered(error: &Error) {
    let trace_id = TraceId::current()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let detail = error.detail().unwrap_or_default();
    match error.category() {
        ErrorCategory::Internal => {
            error!(code = %error.code(), detail, trace_id = %trace_id, "request failed");
        }
        ErrorCategory::Unauthorized => {
            warn!(code = %error.code(), detail, trace_id = %trace_id, "request rejected");
        }
        ErrorCategory::Validation => {
            debug!(code = %error.code(), detail, trace_id = %trace_id, "request invalid");
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.category())
    }

    fn error_response(&self) -> HttpResponse {
        log_rendered(self);
        HttpResponse::build(self.status_code()).json(ErrorEnvelope::from(self))
    }
}

/// Body decoding failures: a missing or foreign content type is reported as
/// such, anything else as a malformed request.
pub(crate) fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = match err {
        JsonPayloadError::ContentType => ErrorCode::WrongContentType,
        _ => ErrorCode::InvalidMedicalRecordRequest,
    };
    Error::new(code).wrap(err.to_string()).into()
}

/// Query string decoding failures.
pub(crate) fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::new(ErrorCode::InvalidParam).wrap(err.to_string()).into()
}
