// tests/common/mod.rs
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::Client;
use serde_json::json;

use crate::cache::store::CredentialStore;
use crate::cache::token::CachedCredential;
use crate::errors::TokenError;
use crate::helpers::time::Clock;
use crate::sources::key_document::ServiceAccountKey;
use crate::sources::IdentityProviderClient;

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_rsa_key.pem");
pub const NOW: i64 = 1_760_000_000;

/// Clock frozen at a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock(Arc<AtomicI64>);

impl FixedClock {
    pub fn at(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// In-memory identity provider that records every exchange.
#[derive(Debug, Clone)]
pub struct StubProvider {
    outcome: Result<String, String>,
    calls: Arc<AtomicUsize>,
    principals: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn issuing(token: &str) -> Self {
        Self::with_outcome(Ok(token.to_owned()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_outcome(Err(reason.to_owned()))
    }

    fn with_outcome(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            principals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn principals(&self) -> Vec<String> {
        self.principals.lock().unwrap().clone()
    }
}

impl IdentityProviderClient for StubProvider {
    async fn issue_token(&self, principal: &str, _key: &ServiceAccountKey) -> Result<String, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.principals.lock().unwrap().push(principal.to_owned());
        self.outcome.clone().map_err(TokenError::ProviderAuth)
    }
}

/// In-memory credential store counting reads and writes.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    clock: FixedClock,
    record: Arc<Mutex<Option<CachedCredential>>>,
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn empty(clock: FixedClock) -> Self {
        Self {
            clock,
            record: Arc::new(Mutex::new(None)),
            loads: Arc::new(AtomicUsize::new(0)),
            saves: Arc::new(AtomicUsize::new(0)),
            fail_writes: false,
        }
    }

    pub fn holding(clock: FixedClock, issued_at: i64, token: &str) -> Self {
        let store = Self::empty(clock);
        *store.record.lock().unwrap() = Some(CachedCredential::new(issued_at, token.to_owned()));
        store
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn record(&self) -> Option<CachedCredential> {
        self.record.lock().unwrap().clone()
    }
}

impl CredentialStore for MemoryStore {
    async fn load(&self) -> Option<CachedCredential> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.record()
    }

    async fn save(&self, token: &str) -> Result<CachedCredential, TokenError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(TokenError::StoreWrite {
                path: PathBuf::from("/memory"),
                reason: "permission denied".to_owned(),
            });
        }
        let credential = CachedCredential::new(self.clock.now(), token.to_owned());
        *self.record.lock().unwrap() = Some(credential.clone());
        Ok(credential)
    }
}

/// Service account key JSON signed with the throwaway fixture key.
pub fn service_account_json(client_email: Option<&str>, token_uri: Option<&str>) -> String {
    let mut key = json!({
        "type": "service_account",
        "project_id": "demo-project",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_id": "1234567890",
    });
    if let Some(email) = client_email {
        key["client_email"] = json!(email);
    }
    if let Some(uri) = token_uri {
        key["token_uri"] = json!(uri);
    }
    key.to_string()
}

pub fn write_key_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("service-account.json");
    std::fs::write(&path, content).expect("write key file");
    path
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
