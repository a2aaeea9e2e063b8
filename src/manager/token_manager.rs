use std::path::PathBuf;

use tracing::{debug, info};

use crate::cache::store::CredentialStore;
use crate::cache::validity::{evaluate, Validity};
use crate::errors::TokenError;
use crate::helpers::time::Clock;
use crate::sources::generator::TokenGenerator;
use crate::sources::IdentityProviderClient;
use crate::utils::constants::DEFAULT_TTL_SECONDS;

/// One "give me a usable token" call.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    /// Explicit principal; derived from the key document when `None`.
    pub service_account: Option<String>,
    pub key_file: PathBuf,
    pub force_refresh: bool,
    /// Cached tokens at least this old are discarded. Kept below the
    /// provider's 3600s lifetime.
    pub ttl_seconds: u64,
}

impl TokenRequest {
    pub fn new(key_file: impl Into<PathBuf>) -> Self {
        Self {
            service_account: None,
            key_file: key_file.into(),
            force_refresh: false,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// A blank service account is the same as none.
    pub fn with_service_account(mut self, service_account: Option<String>) -> Self {
        self.service_account = service_account
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

/// Where the returned token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cache,
    Generated,
}

pub struct TokenManager<P, S, C> {
    provider: P,
    store: S,
    clock: C,
}

impl<P, S, C> TokenManager<P, S, C>
where
    P: IdentityProviderClient,
    S: CredentialStore,
    C: Clock,
{
    pub fn new(provider: P, store: S, clock: C) -> Self {
        Self {
            provider,
            store,
            clock,
        }
    }

    pub async fn get_token(&self, request: &TokenRequest) -> Result<String, TokenError> {
        self.get_token_with_source(request).await.map(|(token, _)| token)
    }

    /// Returns the cached token while it is fresh, otherwise a newly issued
    /// one. `force_refresh` skips the cache without reading it. At most one
    /// provider exchange happens per call.
    pub async fn get_token_with_source(&self, request: &TokenRequest) -> Result<(String, TokenSource), TokenError> {
        if request.force_refresh {
            info!("force refresh requested, bypassing token cache");
            return self.generate(request).await;
        }

        let cached = self.store.load().await;
        let now = self.clock.now();
        match (evaluate(cached.as_ref(), request.ttl_seconds, now), cached) {
            (Validity::Fresh, Some(credential)) => {
                debug!(
                    "using cached token, age {}s of {}s",
                    credential.age(now),
                    request.ttl_seconds
                );
                Ok((credential.token, TokenSource::Cache))
            }
            (validity, _) => {
                info!("cached token is {:?}, generating a new one", validity);
                self.generate(request).await
            }
        }
    }

    async fn generate(&self, request: &TokenRequest) -> Result<(String, TokenSource), TokenError> {
        TokenGenerator::new(&self.provider, &self.store)
            .generate(&request.key_file, request.service_account.as_deref())
            .await
            .map(|token| (token, TokenSource::Generated))
    }
}
