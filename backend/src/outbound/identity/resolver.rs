//! JWT-backed implementation of the identity resolver port.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::ports::IdentityResolver;
use crate::domain::{Email, Error, User};

use super::config::IdentityConfig;
use super::error::IdentityError;
use super::jwks::JwksCache;

enum KeySource {
    Jwks(JwksCache),
    Static(DecodingKey),
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    // Google has emitted both booleans and strings here.
    #[serde(default)]
    email_verified: Option<Value>,
}

impl IdentityClaims {
    fn into_user(self) -> Result<User, IdentityError> {
        let verified = match &self.email_verified {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => !flag.eq_ignore_ascii_case("false"),
            _ => true,
        };
        if !verified {
            return Err(IdentityError::UnverifiedEmail);
        }
        let raw = self.email.ok_or(IdentityError::MissingEmail)?;
        let email = Email::parse(&raw)?;
        Ok(User::new(email, self.name.unwrap_or_default(), self.sub))
    }
}

/// Verifies provider-issued identity tokens.
///
/// Checks the signature, `exp`, `aud` and `iss`, then maps the `sub`,
/// `email` and `name` claims onto a [`User`]. Nothing is persisted.
pub struct JwtIdentityResolver {
    keys: KeySource,
    config: IdentityConfig,
}

impl JwtIdentityResolver {
    /// Resolver backed by the key set `config` points at.
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        Ok(Self {
            keys: KeySource::Jwks(JwksCache::new(&config)?),
            config,
        })
    }

    /// Resolver that verifies every token with `key`.
    pub fn with_static_key(key: DecodingKey, config: IdentityConfig) -> Self {
        Self {
            keys: KeySource::Static(key),
            config,
        }
    }

    /// Verify `token` and return the identity it asserts.
    pub async fn verify(&self, token: &str) -> Result<User, IdentityError> {
        let header =
            decode_header(token).map_err(|err| IdentityError::Malformed(err.to_string()))?;
        if !self.config.algorithms().contains(&header.alg) {
            return Err(IdentityError::DisallowedAlgorithm(format!("{:?}", header.alg)));
        }
        let validation = self.validation(header.alg);

        let claims = match &self.keys {
            KeySource::Static(key) => decode_claims(token, key, &validation)?,
            KeySource::Jwks(cache) => {
                let kid = header.kid.as_deref().ok_or(IdentityError::MissingKeyId)?;
                let key = cache.get_key(kid).await?;
                match decode_claims(token, &key, &validation) {
                    Err(IdentityError::InvalidSignature) => {
                        if !cache.refresh_for_rotation().await? {
                            return Err(IdentityError::InvalidSignature);
                        }
                        debug!(kid, "retrying signature check with refreshed keys");
                        let key = cache.get_key(kid).await?;
                        decode_claims(token, &key, &validation)?
                    }
                    other => other?,
                }
            }
        };

        claims.into_user()
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.algorithms = self.config.algorithms().to_vec();
        validation.leeway = self.config.leeway_secs();
        validation.set_audience(&[self.config.audience()]);
        validation.set_issuer(self.config.issuers());
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation
    }
}

fn decode_claims(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<IdentityClaims, IdentityError> {
    decode::<IdentityClaims>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidSignature => IdentityError::InvalidSignature,
            ErrorKind::ExpiredSignature => IdentityError::Expired,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => IdentityError::Rejected(err.to_string()),
            _ => IdentityError::Malformed(err.to_string()),
        })
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<User, Error> {
        self.verify(token).await.map_err(|err| {
            match &err {
                IdentityError::KeyFetch(_) => error!(error = %err, "identity keys unavailable"),
                _ => warn!(error = %err, "identity token rejected"),
            }
            Error::unauthorized(err.to_string())
        })
    }
}
