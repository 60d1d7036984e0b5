//! Domain-level error taxonomy.
//!
//! Every failure the service reports is drawn from the closed [`ErrorCode`]
//! registry. Codes are stable two-segment strings (`"04-002"`) paired with a
//! fixed human message. Inbound adapters map a code's [`ErrorCategory`] onto
//! a transport status; they never invent codes of their own.
//!
//! Diagnostic detail attached with [`Error::wrap`] is for server-side logs
//! only and is never serialised.

use std::fmt;

use serde::{Serialize, Serializer};

/// Coarse grouping that decides the transport status of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unexpected failure, usually storage. Detail is never exposed.
    Internal,
    /// Malformed or empty caller input.
    Validation,
    /// Identity or ownership failure.
    Unauthorized,
}

/// Registry of every error the service can report.
///
/// # Examples
/// ```
/// use record_service::domain::{ErrorCategory, ErrorCode};
///
/// assert_eq!(ErrorCode::InvalidId.as_str(), "05-002");
/// assert_eq!(ErrorCode::InvalidId.category(), ErrorCategory::Validation);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected server-side failure.
    Internal,
    /// Missing or invalid identity, or a record the caller does not own.
    Unauthorized,
    /// The resolved user lacks the fields required to sign in.
    EmptyUser,
    /// No medical record payload was supplied.
    EmptyMedicalRecord,
    /// Symptom, diagnosis, or therapy was blank after trimming.
    InvalidMedicalRecordAttribute,
    /// The request body could not be decoded.
    InvalidMedicalRecordRequest,
    /// The request body was not declared as JSON.
    WrongContentType,
    /// An opaque identifier in the path could not be decoded.
    InvalidId,
    /// A query parameter could not be decoded.
    InvalidParam,
}

impl ErrorCode {
    /// Every registered code, in registry order.
    pub const ALL: [Self; 9] = [
        Self::Internal,
        Self::Unauthorized,
        Self::EmptyUser,
        Self::EmptyMedicalRecord,
        Self::InvalidMedicalRecordAttribute,
        Self::InvalidMedicalRecordRequest,
        Self::WrongContentType,
        Self::InvalidId,
        Self::InvalidParam,
    ];

    /// Stable wire code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "01-001",
            Self::Unauthorized => "02-001",
            Self::EmptyUser => "03-001",
            Self::EmptyMedicalRecord => "04-001",
            Self::InvalidMedicalRecordAttribute => "04-002",
            Self::InvalidMedicalRecordRequest => "04-003",
            Self::WrongContentType => "05-001",
            Self::InvalidId => "05-002",
            Self::InvalidParam => "05-003",
        }
    }

    /// Human-readable message returned to clients.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Internal => "Internal server error",
            Self::Unauthorized => "Unauthorized",
            Self::EmptyUser => "User is empty",
            Self::EmptyMedicalRecord => "Medical record is empty",
            Self::InvalidMedicalRecordAttribute => {
                "Symptom, diagnosis, and therapy must not be empty"
            }
            Self::InvalidMedicalRecordRequest => "Medical record request body is malformed",
            Self::WrongContentType => "Content-Type must be application/json",
            Self::InvalidId => "ID is invalid",
            Self::InvalidParam => "Query parameter is invalid",
        }
    }

    /// Category used for status mapping.
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::Internal => ErrorCategory::Internal,
            Self::Unauthorized => ErrorCategory::Unauthorized,
            Self::EmptyUser
            | Self::EmptyMedicalRecord
            | Self::InvalidMedicalRecordAttribute
            | Self::InvalidMedicalRecordRequest
            | Self::WrongContentType
            | Self::InvalidId
            | Self::InvalidParam => ErrorCategory::Validation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A domain failure: a registered code plus optional diagnostic detail.
///
/// Two errors are equal when their codes are equal; detail text is ignored.
///
/// # Examples
/// ```
/// use record_service::domain::{Error, ErrorCode};
///
/// let err = Error::internal("connection reset");
/// assert_eq!(err, Error::new(ErrorCode::Internal));
/// assert_eq!(err.detail(), Some("connection reset"));
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    code: ErrorCode,
    detail: Option<String>,
}

impl Error {
    /// Create an error carrying only its registered code.
    pub const fn new(code: ErrorCode) -> Self {
        Self { code, detail: None }
    }

    /// Attach diagnostic detail while keeping the code.
    ///
    /// Wrapping an error that already carries detail prefixes the new text,
    /// so the outermost context reads first.
    #[must_use]
    pub fn wrap(self, detail: impl Into<String>) -> Self {
        let context = detail.into();
        let detail = match self.detail {
            Some(inner) => format!("{context}: {inner}"),
            None => context,
        };
        Self {
            code: self.code,
            detail: Some(detail),
        }
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal).wrap(detail)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized).wrap(detail)
    }

    /// Registered code.
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Category of the registered code.
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Client-facing message of the registered code.
    pub const fn message(&self) -> &'static str {
        self.code.message()
    }

    /// Server-side diagnostic detail, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.code.message())?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
