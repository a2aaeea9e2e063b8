use std::path::Path;

use tracing::{info, warn};

use crate::cache::store::CredentialStore;
use crate::errors::TokenError;
use crate::sources::key_document::ServiceAccountKey;
use crate::sources::IdentityProviderClient;

/// Exchanges a service account key for a new token and caches the result.
pub struct TokenGenerator<'a, P, S> {
    provider: &'a P,
    store: &'a S,
}

impl<'a, P, S> TokenGenerator<'a, P, S>
where
    P: IdentityProviderClient,
    S: CredentialStore,
{
    pub fn new(provider: &'a P, store: &'a S) -> Self {
        Self { provider, store }
    }

    /// Resolve the principal, exchange its key for a token, then cache it.
    ///
    /// The principal is `identity` when given, otherwise the key document's
    /// `client_email`. A failed cache write is logged and the token is still
    /// returned.
    pub async fn generate(&self, key_file: &Path, identity: Option<&str>) -> Result<String, TokenError> {
        let explicit = identity.map(str::trim).filter(|id| !id.is_empty());

        let key = match ServiceAccountKey::read(key_file).await {
            Ok(key) => key,
            Err(err) => {
                return Err(match explicit {
                    None => TokenError::IdentityResolution(err.to_string()),
                    Some(_) => TokenError::ProviderAuth(err.to_string()),
                })
            }
        };

        let principal = match explicit {
            Some(id) => id,
            None => key.identity().ok_or_else(|| {
                TokenError::IdentityResolution(format!(
                    "credentials file '{}' has no client_email and no service account was given",
                    key_file.display()
                ))
            })?,
        };

        info!("requesting a new access token for '{}'", principal);
        let token = self.provider.issue_token(principal, &key).await?;

        if let Err(err) = self.store.save(&token).await {
            warn!("{}; returning the new token uncached", err);
        }
        Ok(token)
    }
}
