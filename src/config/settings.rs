use std::path::PathBuf;

use serde::Deserialize;

use crate::utils::constants::{
    CACHE_DIR_NAME, CACHE_FILE_NAME, DEFAULT_FCM_ENDPOINT, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_TTL_SECONDS,
    MESSAGING_SCOPE,
};

/// ================================
/// Global settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SettingsConfig {
    pub token: TokenSettings,
    pub http: HttpConfig,
    pub messaging: MessagingConfig,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Token lifecycle
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TokenSettings {
    /// invariant: > 0
    pub ttl_seconds: u64,
    pub cache_path: Option<PathBuf>,
    pub scopes: Vec<String>,
    /// overrides the token_uri of the key document
    pub token_uri: Option<String>,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cache_path: None,
            scopes: vec![MESSAGING_SCOPE.to_owned()],
            token_uri: None,
        }
    }
}

impl TokenSettings {
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(default_cache_path)
    }
}

pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
        .join(CACHE_FILE_NAME)
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MessagingConfig {
    pub endpoint: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FCM_ENDPOINT.to_owned(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}
