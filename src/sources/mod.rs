/// Sources module
///
/// Everything that talks to the identity provider: reading the service
/// account key, exchanging it for an access token, and turning a fresh token
/// into a cached one.
use std::future::Future;

use crate::errors::TokenError;

pub mod generator;
pub mod key_document;
pub mod oauth2;

use key_document::ServiceAccountKey;

/// Issues bearer tokens for a principal.
pub trait IdentityProviderClient {
    /// Authenticate `principal` with the material in `key` and return an
    /// access token scoped for messaging. Any failure is `TokenError::ProviderAuth`.
    fn issue_token(
        &self,
        principal: &str,
        key: &ServiceAccountKey,
    ) -> impl Future<Output = Result<String, TokenError>> + Send;
}
