use std::path::Path;

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::settings::SettingsConfig;
use crate::errors::ConfigError;

/// Load, expand and validate the YAML config. No path means built-in defaults.
pub async fn load_config(path: Option<&Path>) -> Result<SettingsConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(SettingsConfig::default());
    };

    let content = tokio::fs::read_to_string(path).await.map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<SettingsConfig, ConfigError> {
    let expanded = expand_env_vars(content)?;
    let config: SettingsConfig = if expanded.trim().is_empty() {
        SettingsConfig::default()
    } else {
        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::Parse(e.to_string()))?
    };

    debug!("validating config ...");
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SettingsConfig) -> Result<(), ConfigError> {
    if config.token.ttl_seconds == 0 {
        return Err(ConfigError::Invalid("token.ttl_seconds must be greater than 0".into()));
    }
    if config.token.scopes.iter().all(|s| s.trim().is_empty()) {
        return Err(ConfigError::Invalid("token.scopes must contain at least one scope".into()));
    }
    if config.http.timeout_ms == 0 {
        return Err(ConfigError::Invalid("http.timeout_ms must be greater than 0".into()));
    }
    if config.messaging.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("messaging.endpoint must not be empty".into()));
    }
    Ok(())
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(re
        .replace_all(input, |caps: &Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}
