//! Verification settings for identity tokens.

use std::time::Duration;

use jsonwebtoken::Algorithm;

/// OpenID discovery document published by Google.
pub const GOOGLE_DISCOVERY_URL: &str =
    "https://accounts.google.com/.well-known/openid-configuration";

/// Issuer values Google places in the `iss` claim.
pub const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// Where the signing key set is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySetLocation {
    /// OpenID discovery document whose `jwks_uri` names the key set.
    Discovery(String),
    /// Key set URL used as is.
    Direct(String),
}

/// Settings for [`super::JwtIdentityResolver`].
///
/// ```
/// use std::time::Duration;
/// use record_service::outbound::identity::{IdentityConfig, KeySetLocation};
///
/// let config = IdentityConfig::new("client-id.apps.example.com")
///     .with_cache_ttl(Duration::from_secs(600));
/// assert!(matches!(config.key_set(), KeySetLocation::Discovery(_)));
/// assert_eq!(config.cache_ttl(), Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    audience: String,
    issuers: Vec<String>,
    key_set: KeySetLocation,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    algorithms: Vec<Algorithm>,
    leeway_secs: u64,
    fetch_timeout: Duration,
    connect_timeout: Duration,
}

impl IdentityConfig {
    /// Google defaults for `audience`: discovery-based keys, Google issuers,
    /// RS256 only, an hour of key caching and at most one refetch every ten
    /// seconds. Key fetches give up after five seconds.
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuers: GOOGLE_ISSUERS.iter().map(|issuer| (*issuer).to_owned()).collect(),
            key_set: KeySetLocation::Discovery(GOOGLE_DISCOVERY_URL.to_owned()),
            cache_ttl: Duration::from_secs(3600),
            min_refresh_interval: Duration::from_secs(10),
            algorithms: vec![Algorithm::RS256],
            leeway_secs: 60,
            fetch_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Replace the accepted issuers.
    #[must_use]
    pub fn with_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the key set location.
    #[must_use]
    pub fn with_key_set(mut self, key_set: KeySetLocation) -> Self {
        self.key_set = key_set;
        self
    }

    /// How long fetched keys stay fresh.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Minimum spacing between key set fetches.
    #[must_use]
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Replace the algorithm allow-list. An empty list rejects every token.
    #[must_use]
    pub fn with_algorithms(mut self, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    /// Clock skew tolerated on `exp` and `nbf`.
    #[must_use]
    pub fn with_leeway_secs(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Upper bound on a single key set or discovery request.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Upper bound on establishing the connection for a fetch.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuers(&self) -> &[String] {
        &self.issuers
    }

    pub fn key_set(&self) -> &KeySetLocation {
        &self.key_set
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn min_refresh_interval(&self) -> Duration {
        self.min_refresh_interval
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}
