//! Shared constants and invariants

/// Cached tokens are dropped after 55 minutes; Google issues them for 60.
pub const DEFAULT_TTL_SECONDS: u64 = 3300;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const CACHE_DIR_NAME: &str = "fcm-send";
pub const CACHE_FILE_NAME: &str = "access_token";
