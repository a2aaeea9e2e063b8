use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::CommandFactory;
use reqwest::Client;
use tracing::{info, warn};

use crate::cache::store::{CredentialStore, FileCredentialStore};
use crate::cli::args::{Args, Mode};
use crate::errors::{SendError, TokenError};
use crate::helpers::time::{Clock, SystemClock};
use crate::manager::token_manager::{TokenManager, TokenRequest, TokenSource};
use crate::messaging::client::FcmClient;
use crate::messaging::composer::{compose_data_only, compose_notification, parse_data, SendRequest};
use crate::sources::key_document::ServiceAccountKey;
use crate::sources::oauth2::JwtBearerProvider;
use crate::sources::IdentityProviderClient;
use crate::utils::constants::CREDENTIALS_ENV;
use crate::utils::{config_loader, logging};

const RULE_WIDTH: usize = 60;
const PREVIEW_CHARS: usize = 50;

pub async fn run(args: Args, mode: Mode) -> Result<()> {
    // -------------------------------
    // 1. Load config, init logging
    // -------------------------------

    let settings = config_loader::run(args.config.as_deref()).await?;
    logging::run(&settings, args.log_level);

    if mode == Mode::Help {
        Args::command().print_help()?;
        return Ok(());
    }

    // -------------------------------
    // 2. Wire the token manager
    // -------------------------------

    let key_file = args.credentials_key_file.clone().ok_or_else(|| {
        TokenError::IdentityResolution(format!(
            "No credentials provided. Please provide one of the following:\n  \
             1. Use --credentials-key-file /path/to/service-account.json\n  \
             2. Set environment variable: export {}=/path/to/service-account.json",
            CREDENTIALS_ENV
        ))
    })?;

    let client = Client::builder()
        .timeout(Duration::from_millis(settings.http.timeout_ms))
        .build()
        .context("failed to build HTTP client")?;

    let cache_path = args.cache_file.clone().unwrap_or_else(|| settings.token.cache_path());
    let provider = JwtBearerProvider::new(
        client.clone(),
        settings.token.scopes.clone(),
        settings.token.token_uri.clone(),
    );
    let manager = TokenManager::new(provider, FileCredentialStore::new(cache_path, SystemClock), SystemClock);

    let request = TokenRequest::new(key_file)
        .with_service_account(args.service_account.clone())
        .with_force_refresh(args.force_refresh)
        .with_ttl_seconds(args.ttl_seconds.unwrap_or(settings.token.ttl_seconds));

    // -------------------------------
    // 3. Execute
    // -------------------------------

    match mode {
        Mode::Info => show_info(&manager, &request, args.project_id.as_deref(), false).await,
        Mode::InfoHttp => show_info(&manager, &request, args.project_id.as_deref(), true).await,
        Mode::PrintToken => {
            let token = manager.get_token(&request).await?;
            println!("{}", token);
            Ok(())
        }
        Mode::DataOnly { device_token, data } => {
            let message = compose_data_only(&device_token, parse_data(&data, "--data-only")?, args.dry_run);
            let fcm = FcmClient::new(client, settings.messaging.endpoint.clone());
            deliver(&manager, &request, &fcm, args.project_id.as_deref(), &message, "Data message").await
        }
        Mode::Notification {
            device_token,
            title,
            body,
        } => {
            let data = args.data.as_deref().map(|d| parse_data(d, "--data")).transpose()?;
            let message = compose_notification(&device_token, &title, &body, args.image.as_deref(), data, args.dry_run);
            let fcm = FcmClient::new(client, settings.messaging.endpoint.clone());
            deliver(&manager, &request, &fcm, args.project_id.as_deref(), &message, "Notification").await
        }
        Mode::Help => Ok(()),
    }
}

async fn show_info<P, S, C>(
    manager: &TokenManager<P, S, C>,
    request: &TokenRequest,
    project_override: Option<&str>,
    with_preview: bool,
) -> Result<()>
where
    P: IdentityProviderClient,
    S: CredentialStore,
    C: Clock,
{
    // An unreadable key only blanks the header; the token lookup below
    // classifies the failure.
    let key = match ServiceAccountKey::read(&request.key_file).await {
        Ok(key) => Some(key),
        Err(err) => {
            warn!("{}", err);
            None
        }
    };
    let key_project = key.as_ref().and_then(ServiceAccountKey::project);
    let key_identity = key.as_ref().and_then(ServiceAccountKey::identity);

    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", rule);
    println!("Firebase Service Account Information");
    println!("{}", rule);
    println!("  PROJECT_ID:            {}", project_override.or(key_project).unwrap_or("N/A"));
    println!(
        "  SERVICE_ACCOUNT_EMAIL: {}",
        request.service_account.as_deref().or(key_identity).unwrap_or("N/A")
    );
    println!("  CREDENTIALS_FILE:      {}", request.key_file.display());
    println!("{}", rule);

    let (token, source) = manager.get_token_with_source(request).await?;
    let origin = match source {
        TokenSource::Cache => "cached",
        TokenSource::Generated => "new",
    };
    if with_preview {
        println!("\n  ACCESS_TOKEN (first {} chars): {}...", PREVIEW_CHARS, token_preview(&token));
    }
    println!("  ACCESS_TOKEN ({}):\n{}", origin, token);
    println!("{}\n", rule);
    Ok(())
}

pub(crate) fn token_preview(token: &str) -> String {
    token.chars().take(PREVIEW_CHARS).collect()
}

async fn deliver<P, S, C>(
    manager: &TokenManager<P, S, C>,
    request: &TokenRequest,
    fcm: &FcmClient,
    project_override: Option<&str>,
    message: &SendRequest,
    label: &str,
) -> Result<()>
where
    P: IdentityProviderClient,
    S: CredentialStore,
    C: Clock,
{
    let access_token = manager.get_token(request).await?;
    let project_id = resolve_project(project_override, &request.key_file).await?;
    info!("sending {} to project '{}'", label.to_lowercase(), project_id);

    let name = fcm.send(&project_id, &access_token, message).await?;
    if message.validate_only {
        println!("\n✓ Dry run successful! {} is valid.", label);
        println!("  Message ID (dry run): {}", name);
    } else {
        println!("\n✓ {} sent successfully!", label);
        println!("  Message ID: {}", name);
    }
    Ok(())
}

async fn resolve_project(project_override: Option<&str>, key_file: &Path) -> Result<String> {
    if let Some(project) = project_override.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(project.to_owned());
    }
    let key = ServiceAccountKey::read(key_file)
        .await
        .context("cannot determine the Firebase project")?;
    key.project()
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("credentials file '{}' has no project_id; pass --project-id", key_file.display()))
}

/// Exit status for a failed run: 3 identity resolution, 4 provider auth,
/// 5 message delivery, 1 anything else. Usage errors exit with 2 from clap.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(token_error) = err.downcast_ref::<TokenError>() {
        return match token_error {
            TokenError::IdentityResolution(_) => 3,
            TokenError::ProviderAuth(_) => 4,
            TokenError::StoreWrite { .. } => 1,
        };
    }
    match err.downcast_ref::<SendError>() {
        Some(SendError::InvalidPayload(_)) => 1,
        Some(_) => 5,
        None => 1,
    }
}
