//! # FCM Sender Library
//!
//! Obtains a Google OAuth2 access token for a service account, caches it on
//! disk, and uses it to send Firebase Cloud Messaging messages.
//!
//! Modules:
//! - `cache` — on-disk credential record and its validity against a TTL
//! - `sources` — service account key reading and the token exchange
//! - `manager` — cached-or-generated token orchestration
//! - `messaging` — FCM v1 message composition and delivery
//! - `config` — YAML settings with defaults and validation

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod manager;
pub mod messaging;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::errors::{ConfigError, KeyDocumentError, SendError, TokenError};
pub use crate::manager::token_manager::{TokenManager, TokenRequest, TokenSource};
