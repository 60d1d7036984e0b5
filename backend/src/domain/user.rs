//! Authenticated user identity.
//!
//! A [`User`] is only ever built from a verified identity token. The email
//! address doubles as the tenant key that scopes every medical record.

use std::fmt;

use thiserror::Error;

/// Validation errors raised when constructing identity values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The email was blank after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email did not have a single `@` with text on both sides.
    #[error("email must contain a local part and a domain")]
    MalformedEmail,
}

/// Email address identifying a tenant.
///
/// # Examples
/// ```
/// use record_service::domain::Email;
///
/// let email = Email::parse("  ada@example.com ").expect("valid email");
/// assert_eq!(email.as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Trim and validate a raw email address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::MalformedEmail),
        }
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    email: Email,
    name: String,
    provider_subject: String,
}

impl User {
    /// Assemble a user from verified claims.
    pub fn new(email: Email, name: impl Into<String>, provider_subject: impl Into<String>) -> Self {
        Self {
            email,
            name: name.into(),
            provider_subject: provider_subject.into(),
        }
    }

    /// Tenant email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subject identifier issued by the identity provider.
    pub fn provider_subject(&self) -> &str {
        &self.provider_subject
    }
}
