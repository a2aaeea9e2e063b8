use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::cache::token::CachedCredential;
use crate::errors::TokenError;
use crate::helpers::time::Clock;

/// Persistence of the single cached credential.
pub trait CredentialStore {
    /// Returns the stored credential, or `None` when nothing usable is stored.
    fn load(&self) -> impl Future<Output = Option<CachedCredential>> + Send;

    /// Stamps `token` with the current time and replaces the stored record.
    fn save(&self, token: &str) -> impl Future<Output = Result<CachedCredential, TokenError>> + Send;
}

/// Two-line token file readable and writable by the owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore<C> {
    path: PathBuf,
    clock: C,
}

impl<C: Clock> FileCredentialStore<C> {
    pub fn new(path: impl Into<PathBuf>, clock: C) -> Self {
        Self { path: path.into(), clock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<C: Clock> CredentialStore for FileCredentialStore<C> {
    async fn load(&self) -> Option<CachedCredential> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let credential = CachedCredential::from_record(&content);
                if credential.is_none() {
                    debug!("token cache '{}' holds no well-formed record, ignoring", self.path.display());
                }
                credential
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("token cache '{}' does not exist", self.path.display());
                None
            }
            Err(err) => {
                warn!("token cache '{}' is unreadable, ignoring: {}", self.path.display(), err);
                None
            }
        }
    }

    async fn save(&self, token: &str) -> Result<CachedCredential, TokenError> {
        let store_error = |reason: String| TokenError::StoreWrite {
            path: self.path.clone(),
            reason,
        };

        if token.contains(['\n', '\r']) || token.trim().is_empty() {
            return Err(store_error("token must be a single non-empty line".to_owned()));
        }

        let credential = CachedCredential::new(self.clock.now(), token.to_owned());
        write_atomic(&self.path, credential.to_record().as_bytes())
            .await
            .map_err(|err| store_error(err.to_string()))?;

        info!("token cached at '{}', issued_at {}", self.path.display(), credential.issued_at);
        Ok(credential)
    }
}

/// Write to a sibling temp file created with mode 0600, then rename it over `path`.
async fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp = tmp_path(path);
    let result = async {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);

        // umask may have narrowed the mode but never widens it; pin it anyway
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp, path).await
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&tmp).await;
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "token".to_owned());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
