use std::path::PathBuf;
use thiserror::Error;

/// Failures of the token lifecycle.
///
/// A cache miss is not represented here: an expired or absent credential is
/// reported as [`crate::cache::validity::Validity`] and falls through to
/// generation.
#[derive(Error, Debug)]
pub enum TokenError {
    /// No explicit identity was given and none could be read from the key document.
    #[error("cannot resolve service account identity: {0}")]
    IdentityResolution(String),

    /// Principal activation or token issuance failed.
    #[error("identity provider rejected the token request: {0}")]
    ProviderAuth(String),

    /// The credential cache could not be written.
    #[error("failed to write token cache '{path}': {reason}")]
    StoreWrite { path: PathBuf, reason: String },
}

/// Failures while reading a service account key document.
#[derive(Error, Debug)]
pub enum KeyDocumentError {
    #[error("credentials file not found: {0}")]
    NotFound(PathBuf),

    #[error("credentials file '{path}' is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("credentials file '{path}' is not a valid service account key: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Failures while composing or delivering a message.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid message payload: {0}")]
    InvalidPayload(String),

    #[error("FCM send request failed: {0}")]
    Request(String),

    #[error("the FCM token is not registered (device may have uninstalled the app)")]
    Unregistered,

    #[error("the FCM token does not match the sender ID (wrong project?)")]
    SenderIdMismatch,

    #[error("FCM API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid config format: {0}")]
    Parse(String),

    #[error("config is not valid: {0}")]
    Invalid(String),
}
