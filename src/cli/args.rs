use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::utils::constants::CREDENTIALS_ENV;
use crate::utils::logging::LogLevel;

const EXAMPLES: &str = "\
Examples:
  # Show service account info and access token
  fcm-send --credentials-key-file /path/to/service-account.json --info

  # Show service account info and OAuth2 access token for the FCM HTTP API
  fcm-send --info-http

  # Print only the access token, bypassing the cache
  fcm-send --print-token --force-refresh

  # Send a simple notification
  fcm-send --token <YOUR_FCM_TOKEN> --title \"Hello\" --body \"World\"

  # Send notification with custom data
  fcm-send --token <YOUR_FCM_TOKEN> --title \"Order Update\" --body \"Your order shipped\" --data '{\"order_id\": \"12345\"}'

  # Send data-only message (no notification shown)
  fcm-send --token <YOUR_FCM_TOKEN> --data-only '{\"action\": \"sync\", \"id\": \"123\"}'

  # Validate message without sending (dry run)
  fcm-send --token <YOUR_FCM_TOKEN> --title \"Test\" --body \"Test\" --dry-run";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Send Firebase Cloud Messaging notifications", long_about = None, after_help = EXAMPLES)]
pub struct Args {
    /// Path to the service account JSON file
    #[arg(long, value_name = "PATH", env = CREDENTIALS_ENV)]
    pub credentials_key_file: Option<PathBuf>,
    /// Service account to authenticate as (defaults to the key file's client_email)
    #[arg(long, value_name = "EMAIL")]
    pub service_account: Option<String>,
    /// Firebase project (defaults to the key file's project_id)
    #[arg(long, value_name = "ID")]
    pub project_id: Option<String>,

    /// Display service account info and access token
    #[arg(long, visible_alias = "access-token")]
    pub info: bool,
    /// Display service account info and the OAuth2 access token for the FCM HTTP API
    #[arg(long, visible_alias = "access-token-http")]
    pub info_http: bool,
    /// Print only the access token
    #[arg(long)]
    pub print_token: bool,

    /// FCM registration token of the target device
    #[arg(long, value_name = "FCM_TOKEN")]
    pub token: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
    /// Custom data payload as a JSON object
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,
    /// Send a data-only message (no notification) with a JSON payload
    #[arg(long, value_name = "JSON")]
    pub data_only: Option<String>,
    /// Image URL for the notification
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,
    /// Validate the message without actually sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore the cached access token and request a new one
    #[arg(long)]
    pub force_refresh: bool,
    /// Maximum age of a cached access token
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub ttl_seconds: Option<u64>,
    /// Where the access token is cached
    #[arg(long, value_name = "PATH", env = "FCM_SEND_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,
    #[arg(short, long, value_name = "PATH", env = "FCM_SEND_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Info,
    /// Info plus a short preview of the token.
    InfoHttp,
    PrintToken,
    DataOnly { device_token: String, data: String },
    Notification { device_token: String, title: String, body: String },
    Help,
}

impl Args {
    /// Pick the mode from the flags; the first matching mode wins.
    pub fn mode(&self) -> Result<Mode, clap::Error> {
        if self.info {
            return Ok(Mode::Info);
        }
        if self.info_http {
            return Ok(Mode::InfoHttp);
        }
        if self.print_token {
            return Ok(Mode::PrintToken);
        }

        let device_token = given(&self.token);

        if let Some(data) = given(&self.data_only) {
            let device_token = device_token.ok_or_else(|| usage_error("--token is required for sending messages"))?;
            return Ok(Mode::DataOnly {
                device_token: device_token.to_owned(),
                data: data.to_owned(),
            });
        }

        if let Some(device_token) = device_token {
            return match (given(&self.title), given(&self.body)) {
                (Some(title), Some(body)) => Ok(Mode::Notification {
                    device_token: device_token.to_owned(),
                    title: title.to_owned(),
                    body: body.to_owned(),
                }),
                _ => Err(usage_error("--title and --body are required for notifications")),
            };
        }

        Ok(Mode::Help)
    }
}

/// A flag counts as given only when its value is not blank.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn usage_error(message: &str) -> clap::Error {
    Args::command().error(ErrorKind::MissingRequiredArgument, message)
}
