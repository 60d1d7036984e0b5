//! Test utilities for the backend crate.
//!
//! In-memory adapters and a token minter let integration tests drive the full
//! HTTP pipeline without PostgreSQL or a live identity provider. Only
//! compiled with the `test-support` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, encode};
use mockable::DefaultClock;
use opaque_id::OpaqueIdCodec;
use serde_json::{Value, json};

use crate::domain::ports::{
    MedicalRecordStore, MedicalRecordStoreError, UserStore, UserStoreError,
};
use crate::domain::{
    AuditStamp, Email, MedicalRecord, MedicalRecordCommandService, MedicalRecordQueryService,
    NewMedicalRecord, RecordChanges, RecordCursor, RecordId, SignInService, User,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::identity::{IdentityConfig, JwtIdentityResolver};

/// Salt used by [`test_codec`].
pub const TEST_SALT: &str = "record-service-test-salt";
/// Audience accepted by [`TokenMinter::resolver`].
pub const TEST_AUDIENCE: &str = "records.test";
/// Issuer accepted by [`TokenMinter::resolver`].
pub const TEST_ISSUER: &str = "https://issuer.test";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test store mutex poisoned"),
    }
}

/// Opaque id codec configured like a default deployment.
pub fn test_codec() -> OpaqueIdCodec {
    match OpaqueIdCodec::new(TEST_SALT, 10) {
        Ok(codec) => codec,
        Err(error) => panic!("test codec: {error}"),
    }
}

/// Record store keeping rows in memory with monotonically assigned ids.
#[derive(Default)]
pub struct InMemoryMedicalRecordStore {
    rows: Mutex<Vec<MedicalRecord>>,
}

impl InMemoryMedicalRecordStore {
    /// Snapshot of every stored record in insertion order.
    pub fn records(&self) -> Vec<MedicalRecord> {
        lock(&self.rows).clone()
    }
}

#[async_trait]
impl MedicalRecordStore for InMemoryMedicalRecordStore {
    async fn insert(&self, record: &NewMedicalRecord) -> Result<RecordId, MedicalRecordStoreError> {
        let mut rows = lock(&self.rows);
        let next = i64::try_from(rows.len())
            .map_err(|err| MedicalRecordStoreError::query(err.to_string()))?
            + 1;
        let id = RecordId::try_from(next)
            .map_err(|err| MedicalRecordStoreError::query(err.to_string()))?;
        rows.push(record.clone().into_record(id));
        Ok(id)
    }

    async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<MedicalRecord>, MedicalRecordStoreError> {
        Ok(lock(&self.rows).iter().find(|row| row.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        owner: &Email,
        cursor: RecordCursor,
        limit: u32,
    ) -> Result<Vec<MedicalRecord>, MedicalRecordStoreError> {
        let mut page: Vec<MedicalRecord> = lock(&self.rows)
            .iter()
            .filter(|row| row.is_owned_by(owner) && row.id().as_i64() < cursor.as_i64())
            .cloned()
            .collect();
        page.sort_by_key(|row| std::cmp::Reverse(row.id()));
        page.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(page)
    }

    async fn record_exists(
        &self,
        id: RecordId,
        owner: &Email,
    ) -> Result<bool, MedicalRecordStoreError> {
        Ok(lock(&self.rows)
            .iter()
            .any(|row| row.id() == id && row.is_owned_by(owner)))
    }

    async fn update(
        &self,
        id: RecordId,
        changes: &RecordChanges,
    ) -> Result<(), MedicalRecordStoreError> {
        let mut rows = lock(&self.rows);
        if let Some(row) = rows.iter_mut().find(|row| row.id() == id) {
            let audit = AuditStamp {
                created_at: row.audit().created_at,
                created_by: row.audit().created_by.clone(),
                updated_at: changes.updated_at,
                updated_by: changes.updated_by.clone(),
            };
            let result = changes
                .result
                .clone()
                .unwrap_or_else(|| row.result().to_owned());
            *row = MedicalRecord::new(
                id,
                row.owner().clone(),
                changes.content.clone(),
                result,
                audit,
            );
        }
        Ok(())
    }
}

/// User store keyed by email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, (User, DateTime<Utc>)>>,
}

impl InMemoryUserStore {
    /// Stored user for `email`, if any.
    pub fn get(&self, email: &str) -> Option<User> {
        lock(&self.users).get(email).map(|(user, _)| user.clone())
    }

    /// Number of distinct users seen.
    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    /// Whether no user has signed in yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(&self, user: &User, seen_at: DateTime<Utc>) -> Result<(), UserStoreError> {
        lock(&self.users).insert(user.email().as_str().to_owned(), (user.clone(), seen_at));
        Ok(())
    }
}

/// Issues HS256 identity tokens for tests.
#[derive(Debug, Clone)]
pub struct TokenMinter {
    secret: Vec<u8>,
}

impl Default for TokenMinter {
    fn default() -> Self {
        Self::new(b"record-service-test-secret")
    }
}

impl TokenMinter {
    /// Minter signing with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Claims of a valid, verified token for `email`.
    pub fn claims_for(email: &str) -> Value {
        json!({
            "sub": format!("subject-{email}"),
            "email": email,
            "email_verified": true,
            "name": "Test User",
            "aud": TEST_AUDIENCE,
            "iss": TEST_ISSUER,
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        })
    }

    /// Sign arbitrary `claims`.
    pub fn sign(&self, claims: &Value) -> String {
        match encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(&self.secret),
        ) {
            Ok(token) => token,
            Err(error) => panic!("test token: {error}"),
        }
    }

    /// Valid token for `email`.
    pub fn token_for(&self, email: &str) -> String {
        self.sign(&Self::claims_for(email))
    }

    /// `Authorization` header value carrying a valid token for `email`.
    pub fn bearer_for(&self, email: &str) -> String {
        format!("Bearer {}", self.token_for(email))
    }

    /// Resolver accepting tokens from this minter.
    pub fn resolver(&self) -> JwtIdentityResolver {
        let config = IdentityConfig::new(TEST_AUDIENCE)
            .with_issuers([TEST_ISSUER])
            .with_algorithms([Algorithm::HS256]);
        JwtIdentityResolver::with_static_key(DecodingKey::from_secret(&self.secret), config)
    }
}

/// Fully wired application state over in-memory adapters.
pub struct TestBackend {
    /// Record rows.
    pub records: Arc<InMemoryMedicalRecordStore>,
    /// Signed-in users.
    pub users: Arc<InMemoryUserStore>,
    /// Token issuer trusted by the state's resolver.
    pub minter: TokenMinter,
    /// Codec shared with the HTTP layer.
    pub ids: Arc<OpaqueIdCodec>,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            users: Arc::default(),
            minter: TokenMinter::default(),
            ids: Arc::new(test_codec()),
        }
    }
}

impl TestBackend {
    /// HTTP state listing `page_size` records per page.
    pub fn http_state(&self, page_size: u32) -> HttpState {
        let clock = Arc::new(DefaultClock);
        HttpState {
            identity: Arc::new(self.minter.resolver()),
            sign_in: Arc::new(SignInService::new(self.users.clone(), clock.clone())),
            records: Arc::new(MedicalRecordCommandService::new(self.records.clone(), clock)),
            records_query: Arc::new(
                MedicalRecordQueryService::new(self.records.clone()).with_page_size(page_size),
            ),
            ids: self.ids.clone(),
        }
    }

    /// Opaque form of `id`.
    pub fn opaque(&self, id: u64) -> String {
        match self.ids.encode(id) {
            Ok(opaque) => opaque,
            Err(error) => panic!("encode {id}: {error}"),
        }
    }
}
