use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tokio::fs;

use crate::errors::KeyDocumentError;

/// Google service account key file (the JSON downloaded from the console).
///
/// Every field is optional at parse time; callers decide which ones they need.
#[derive(Clone, Default, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub async fn read(path: &Path) -> Result<Self, KeyDocumentError> {
        let content = fs::read_to_string(path).await.map_err(|err| match err.kind() {
            ErrorKind::NotFound => KeyDocumentError::NotFound(path.to_path_buf()),
            _ => KeyDocumentError::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        })?;
        Self::from_json(&content).map_err(|reason| KeyDocumentError::Malformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str::<Self>(content).map_err(|e| e.to_string())
    }

    /// `client_email`, if present and non-blank.
    pub fn identity(&self) -> Option<&str> {
        non_blank(self.client_email.as_deref())
    }

    pub fn project(&self) -> Option<&str> {
        non_blank(self.project_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// keeps the private key out of logs
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
