use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::TokenError;
use crate::helpers::time::now_i64;
use crate::sources::key_document::ServiceAccountKey;
use crate::sources::IdentityProviderClient;
use crate::utils::constants::{ASSERTION_LIFETIME_SECS, DEFAULT_TOKEN_URI, JWT_BEARER_GRANT};

/// OAuth2 JWT-bearer grant (RFC 7523) against Google's token endpoint.
#[derive(Debug, Clone)]
pub struct JwtBearerProvider {
    client: Client,
    scopes: Vec<String>,
    token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    expires_in: Option<i64>,
    token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl JwtBearerProvider {
    /// `token_uri` overrides the endpoint named in the key document.
    pub fn new(client: Client, scopes: Vec<String>, token_uri: Option<String>) -> Self {
        Self {
            client,
            scopes,
            token_uri,
        }
    }

    fn audience<'a>(&'a self, key: &'a ServiceAccountKey) -> &'a str {
        self.token_uri
            .as_deref()
            .or(key.token_uri.as_deref())
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Sign the assertion that proves possession of the principal's key.
    fn activate(&self, principal: &str, key: &ServiceAccountKey, audience: &str) -> Result<String, TokenError> {
        let pem = key
            .private_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| TokenError::ProviderAuth(format!("principal '{}' rejected: key document has no private_key", principal)))?;

        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| TokenError::ProviderAuth(format!("principal '{}' rejected: invalid private key: {}", principal, e)))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let iat = now_i64();
        let claims = AssertionClaims {
            iss: principal,
            scope: self.scopes.join(" "),
            aud: audience,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&header, &claims, &encoding_key)
            .map_err(|e| TokenError::ProviderAuth(format!("principal '{}' rejected: failed to sign assertion: {}", principal, e)))
    }
}

impl IdentityProviderClient for JwtBearerProvider {
    async fn issue_token(&self, principal: &str, key: &ServiceAccountKey) -> Result<String, TokenError> {
        let audience = self.audience(key);
        let assertion = self.activate(principal, key, audience)?;
        debug!("assertion signed for '{}', exchanging at {}", principal, audience);

        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
        let response = self
            .client
            .post(audience)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TokenError::ProviderAuth(format!("token request to {} timed out", audience))
                } else {
                    TokenError::ProviderAuth(format!("token request to {} failed: {}", audience, e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TokenError::ProviderAuth(format!("failed to read token response: {}", e)))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|err| match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                })
                .unwrap_or(body);
            return Err(TokenError::ProviderAuth(format!("token endpoint returned {}: {}", status, reason)));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| TokenError::ProviderAuth(format!("failed to parse token response: {}", e)))?;
        if token.access_token.trim().is_empty() {
            return Err(TokenError::ProviderAuth("token endpoint returned an empty access_token".to_owned()));
        }

        info!(
            "access token issued for '{}', type {:?}, expires_in {:?}",
            principal, token.token_type, token.expires_in
        );
        Ok(token.access_token)
    }
}
