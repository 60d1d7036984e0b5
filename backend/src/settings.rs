//! Service configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `RECORDS_*` environment variables and config
//! files. They are read once at startup and handed to constructors.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::identity::GOOGLE_DISCOVERY_URL;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration problems that abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Sources could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),
    /// A required key was absent or blank.
    #[error("missing required configuration key `{key}` (env RECORDS_{env})")]
    Missing { key: &'static str, env: &'static str },
}

/// Settings for the medical record service.
///
/// Numeric keys carry defaults so an empty environment still loads; the
/// required keys stay optional here and are checked by
/// [`ServiceSettings::validate`].
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECORDS")]
pub struct ServiceSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Listening port.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Listening address.
    pub bind_host: Option<String>,
    /// Expected `aud` claim of identity tokens.
    pub identity_audience: Option<String>,
    /// OpenID discovery document of the identity provider.
    pub identity_discovery_url: Option<String>,
    /// Salt of the opaque id codec. Must match across every process sharing
    /// the database.
    pub opaque_id_salt: Option<String>,
    /// Minimum length of issued opaque ids.
    #[ortho_config(default = 10)]
    pub opaque_id_min_length: usize,
    /// Records returned per listing page.
    #[ortho_config(default = 10)]
    pub page_size: u32,
    /// Seconds in-flight requests get to finish on shutdown.
    #[ortho_config(default = 5)]
    pub shutdown_grace_secs: u64,
    /// Deadline for a single database operation.
    #[ortho_config(default = 5)]
    pub query_timeout_secs: u64,
    /// Freshness window of cached identity signing keys.
    #[ortho_config(default = 3600)]
    pub jwks_cache_ttl_secs: u64,
}

fn required<'a>(
    value: Option<&'a str>,
    key: &'static str,
    env: &'static str,
) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::Missing { key, env })
}

impl ServiceSettings {
    /// Load settings from the process arguments, environment and files.
    pub fn from_process() -> Result<Self, SettingsError> {
        Self::load_from_iter(std::env::args_os()).map_err(|err| SettingsError::Load(err.to_string()))
    }

    /// Check that every required key is present.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.database_url()?;
        self.identity_audience()?;
        self.opaque_id_salt()?;
        Ok(())
    }

    /// Connection string, or `Missing` when unset.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "database_url", "DATABASE_URL")
    }

    /// Token audience, or `Missing` when unset.
    pub fn identity_audience(&self) -> Result<&str, SettingsError> {
        required(
            self.identity_audience.as_deref(),
            "identity_audience",
            "IDENTITY_AUDIENCE",
        )
    }

    /// Codec salt, or `Missing` when unset or blank.
    pub fn opaque_id_salt(&self) -> Result<&str, SettingsError> {
        required(self.opaque_id_salt.as_deref(), "opaque_id_salt", "OPAQUE_ID_SALT")
    }

    /// Listening address, `0.0.0.0` unless overridden.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Discovery document URL, Google's unless overridden.
    pub fn identity_discovery_url(&self) -> &str {
        self.identity_discovery_url
            .as_deref()
            .unwrap_or(GOOGLE_DISCOVERY_URL)
    }

    /// Listing page size; zero falls back to the default.
    pub fn page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Shutdown grace period.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Per-operation database deadline.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Signing key cache lifetime.
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 11] = [
        "RECORDS_DATABASE_URL",
        "RECORDS_PORT",
        "RECORDS_BIND_HOST",
        "RECORDS_IDENTITY_AUDIENCE",
        "RECORDS_IDENTITY_DISCOVERY_URL",
        "RECORDS_OPAQUE_ID_SALT",
        "RECORDS_OPAQUE_ID_MIN_LENGTH",
        "RECORDS_PAGE_SIZE",
        "RECORDS_SHUTDOWN_GRACE_SECS",
        "RECORDS_QUERY_TIMEOUT_SECS",
        "RECORDS_JWKS_CACHE_TTL_SECS",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("record-service")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_are_used_when_optional_keys_are_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.bind_host(), "0.0.0.0");
        assert_eq!(settings.identity_discovery_url(), GOOGLE_DISCOVERY_URL);
        assert_eq!(settings.opaque_id_min_length, 10);
        assert_eq!(settings.page_size(), 10);
        assert_eq!(settings.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(settings.query_timeout(), Duration::from_secs(5));
        assert_eq!(settings.jwks_cache_ttl(), Duration::from_secs(3600));
    }

    #[rstest]
    fn an_empty_environment_loads_and_reports_the_first_missing_key() {
        let _guard = lock_env(env_with(&[]));

        let err = load_from_empty_args()
            .validate()
            .expect_err("required keys are absent");
        assert_eq!(
            err,
            SettingsError::Missing {
                key: "database_url",
                env: "DATABASE_URL"
            }
        );
    }

    #[rstest]
    #[case("0", 10)]
    #[case("25", 25)]
    fn page_size_zero_falls_back_to_the_default(#[case] raw: &str, #[case] expected: u32) {
        let _guard = lock_env(env_with(&[("RECORDS_PAGE_SIZE", raw)]));

        assert_eq!(load_from_empty_args().page_size(), expected);
    }

    #[rstest]
    fn missing_required_keys_fail_validation() {
        let _guard = lock_env(env_with(&[
            ("RECORDS_DATABASE_URL", "postgres://localhost/records"),
            ("RECORDS_IDENTITY_AUDIENCE", "client.apps.example.com"),
        ]));

        let err = load_from_empty_args().validate().expect_err("salt is missing");
        assert_eq!(
            err,
            SettingsError::Missing {
                key: "opaque_id_salt",
                env: "OPAQUE_ID_SALT"
            }
        );
    }

    #[rstest]
    fn blank_salts_count_as_missing() {
        let _guard = lock_env(env_with(&[("RECORDS_OPAQUE_ID_SALT", "   ")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.opaque_id_salt(),
            Err(SettingsError::Missing { key: "opaque_id_salt", .. })
        ));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("RECORDS_DATABASE_URL", "postgres://db/records"),
            ("RECORDS_IDENTITY_AUDIENCE", "client.apps.example.com"),
            ("RECORDS_OPAQUE_ID_SALT", "pepper"),
            ("RECORDS_PORT", "9090"),
            ("RECORDS_PAGE_SIZE", "25"),
            ("RECORDS_QUERY_TIMEOUT_SECS", "2"),
        ]));

        let settings = load_from_empty_args();
        settings.validate().expect("required keys present");
        assert_eq!(settings.database_url(), Ok("postgres://db/records"));
        assert_eq!(settings.opaque_id_salt(), Ok("pepper"));
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.page_size(), 25);
        assert_eq!(settings.query_timeout(), Duration::from_secs(2));
    }
}
