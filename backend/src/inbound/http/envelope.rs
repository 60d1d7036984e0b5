//! JSON response envelopes.
//!
//! Success bodies are `{"data": <payload>, "meta": {}}`. Failure bodies are
//! `{"errors": [{"code": "CC-NNN", "message": "..."}], "meta": null}`.

use serde::Serialize;

use crate::domain::{Error, ErrorCode};

/// Metadata attached to successful responses. Currently always empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Meta {}

/// Successful response body.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub meta: Meta,
}

impl<T> Envelope<T> {
    /// Wrap `data`.
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            meta: Meta::default(),
        }
    }
}

impl Envelope<()> {
    /// Body for writes that return nothing.
    pub fn empty() -> Self {
        Self {
            data: None,
            meta: Meta::default(),
        }
    }
}

/// Client-visible part of a domain error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    #[schema(value_type = crate::inbound::http::schemas::ErrorCodeSchema, example = "05-002")]
    pub code: ErrorCode,
    #[schema(example = "ID is invalid")]
    pub message: &'static str,
}

/// Failure response body.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorBody>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Meta>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            errors: vec![ErrorBody {
                code: error.code(),
                message: error.message(),
            }],
            meta: None,
        }
    }
}
