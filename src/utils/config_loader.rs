use std::path::Path;
use anyhow::{Context, Result};

use crate::config::loader::load_config;
use crate::config::settings::SettingsConfig;

pub async fn run(config_path: Option<&Path>) -> Result<SettingsConfig> {
    load_config(config_path)
        .await
        .with_context(|| format!("failed to load config {}", config_path.map(|p| p.display().to_string()).unwrap_or_default()))
}
