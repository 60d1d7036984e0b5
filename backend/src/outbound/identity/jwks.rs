//! Lazily populated cache of the provider's signing keys.
//!
//! Readers share an `RwLock`. Refreshes are serialized by a separate mutex
//! and re-check staleness once they hold it, so a burst of requests carrying
//! an unknown `kid` triggers one fetch. Fetches are spaced by the configured
//! minimum interval whatever their outcome, and every request is bounded by
//! the configured timeouts so a hung provider cannot pin the refresh lock.
//! A key that is cached but stale keeps verifying while the provider is
//! unreachable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::config::{IdentityConfig, KeySetLocation};
use super::error::IdentityError;

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeySet {
    keys: Vec<Jwk>,
}

/// Raw components of a published key; decoding keys are rebuilt per use.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedJwk {
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

impl CachedJwk {
    fn to_decoding_key(&self) -> Result<DecodingKey, IdentityError> {
        if self.kty != "RSA" {
            return Err(IdentityError::UnsupportedKey(format!(
                "key type {} is not supported",
                self.kty
            )));
        }
        let n = self
            .n
            .as_deref()
            .ok_or_else(|| IdentityError::UnsupportedKey("RSA key lacks a modulus".into()))?;
        let e = self
            .e
            .as_deref()
            .ok_or_else(|| IdentityError::UnsupportedKey("RSA key lacks an exponent".into()))?;
        DecodingKey::from_rsa_components(n, e)
            .map_err(|err| IdentityError::UnsupportedKey(err.to_string()))
    }
}

/// Index a key set by `kid`, dropping anonymous keys.
fn index_keys(set: KeySet) -> HashMap<String, CachedJwk> {
    set.keys
        .into_iter()
        .filter_map(|jwk| {
            let kid = jwk.kid?;
            Some((
                kid,
                CachedJwk {
                    kty: jwk.kty,
                    n: jwk.n,
                    e: jwk.e,
                },
            ))
        })
        .collect()
}

#[derive(Default)]
struct CacheInner {
    keys: HashMap<String, CachedJwk>,
    jwks_uri: Option<String>,
    last_refresh: Option<Instant>,
    last_refresh_attempt: Option<Instant>,
}

/// Signing keys fetched from the provider, indexed by key id.
pub struct JwksCache {
    inner: RwLock<CacheInner>,
    refresh_lock: Mutex<()>,
    client: reqwest::Client,
    location: KeySetLocation,
    ttl: Duration,
    min_refresh_interval: Duration,
}

impl JwksCache {
    /// Build an empty cache. Nothing is fetched until a key is requested.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|err| IdentityError::KeyFetch(format!("building http client: {err}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Build an empty cache using `client` for fetches.
    pub fn with_client(config: &IdentityConfig, client: reqwest::Client) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            refresh_lock: Mutex::new(()),
            client,
            location: config.key_set().clone(),
            ttl: config.cache_ttl(),
            min_refresh_interval: config.min_refresh_interval(),
        }
    }

    /// Decoding key for `kid`.
    ///
    /// A stale cache is refreshed first; an unknown `kid` forces a refresh
    /// subject to the minimum interval. When the refresh fails, a stale copy
    /// of `kid` is still used.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        let stale = {
            let cache = self.inner.read().await;
            match cache.keys.get(kid) {
                Some(jwk) if !is_stale(cache.last_refresh, self.ttl) => {
                    return jwk.to_decoding_key();
                }
                cached => cached.cloned(),
            }
        };

        if let Err(err) = self.try_refresh(stale.is_none()).await {
            let Some(jwk) = stale else {
                return Err(err);
            };
            warn!(error = %err, kid, "key refresh failed, using stale signing key");
            return jwk.to_decoding_key();
        }

        let cache = self.inner.read().await;
        cache
            .keys
            .get(kid)
            .ok_or_else(|| IdentityError::UnknownKeyId(kid.to_owned()))?
            .to_decoding_key()
    }

    /// Refetch after a signature failure in case the provider rotated keys.
    ///
    /// Returns `false` when the minimum interval suppressed the fetch.
    pub async fn refresh_for_rotation(&self) -> Result<bool, IdentityError> {
        self.try_refresh(true).await
    }

    async fn try_refresh(&self, force: bool) -> Result<bool, IdentityError> {
        if !self.should_refresh(force).await {
            return Ok(false);
        }

        let _guard = self.refresh_lock.lock().await;
        if !self.should_refresh(force).await {
            return Ok(false);
        }
        self.inner.write().await.last_refresh_attempt = Some(Instant::now());

        self.refresh().await?;
        Ok(true)
    }

    async fn should_refresh(&self, force: bool) -> bool {
        let cache = self.inner.read().await;
        (force || is_stale(cache.last_refresh, self.ttl))
            && can_attempt(cache.last_refresh_attempt, self.min_refresh_interval)
    }

    async fn refresh(&self) -> Result<(), IdentityError> {
        let url = self.key_set_url().await?;
        let set: KeySet = self.fetch_json(&url).await?;
        let keys = index_keys(set);
        info!(keys = keys.len(), url = %url, "refreshed identity signing keys");

        let mut cache = self.inner.write().await;
        cache.keys = keys;
        cache.last_refresh = Some(Instant::now());
        Ok(())
    }

    async fn key_set_url(&self) -> Result<String, IdentityError> {
        let discovery = match &self.location {
            KeySetLocation::Direct(url) => return Ok(url.clone()),
            KeySetLocation::Discovery(url) => url,
        };
        if let Some(uri) = self.inner.read().await.jwks_uri.clone() {
            return Ok(uri);
        }

        let document: DiscoveryDocument = self.fetch_json(discovery).await?;
        debug!(jwks_uri = %document.jwks_uri, "resolved key set from discovery document");
        self.inner.write().await.jwks_uri = Some(document.jwks_uri.clone());
        Ok(document.jwks_uri)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, IdentityError> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| IdentityError::KeyFetch(err.to_string()))?
            .json()
            .await
            .map_err(|err| IdentityError::KeyFetch(format!("{url}: {err}")))
    }
}

fn is_stale(last_refresh: Option<Instant>, ttl: Duration) -> bool {
    last_refresh.is_none_or(|at| at.elapsed() >= ttl)
}

fn can_attempt(last_attempt: Option<Instant>, min_interval: Duration) -> bool {
    last_attempt.is_none_or(|at| at.elapsed() >= min_interval)
}
