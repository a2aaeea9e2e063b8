use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::SendError;
use crate::messaging::composer::SendRequest;

/// Client for the FCM HTTP v1 API.
#[derive(Debug, Clone)]
pub struct FcmClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct FcmApiResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FcmErrorEnvelope {
    error: FcmErrorBody,
}

#[derive(Debug, Deserialize)]
struct FcmErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
    #[serde(default)]
    details: Vec<FcmErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct FcmErrorDetail {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

impl FcmClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn send_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint.trim_end_matches('/'),
            project_id
        )
    }

    /// Deliver `request` and return the message name assigned by FCM.
    pub async fn send(&self, project_id: &str, access_token: &str, request: &SendRequest) -> Result<String, SendError> {
        let url = self.send_url(project_id);
        debug!("posting message to {}, validate_only {}", url, request.validate_only);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SendError::Request(e.to_string()))?;

        if status.is_success() {
            let parsed: FcmApiResponse = serde_json::from_str(&body)
                .map_err(|e| SendError::Request(format!("Failed to parse FCM response: {}", e)))?;
            let name = parsed.name.unwrap_or_default();
            info!("FCM accepted message '{}'", name);
            return Ok(name);
        }

        Err(classify_error(status.as_u16(), &body))
    }
}

fn classify_error(status: u16, body: &str) -> SendError {
    let Ok(envelope) = serde_json::from_str::<FcmErrorEnvelope>(body) else {
        return SendError::Api {
            status,
            message: body.trim().to_owned(),
        };
    };

    let error = envelope.error;
    let codes = error.details.iter().filter_map(|d| d.error_code.as_deref());
    for code in codes {
        match code {
            "UNREGISTERED" => return SendError::Unregistered,
            "SENDER_ID_MISMATCH" => return SendError::SenderIdMismatch,
            _ => {}
        }
    }

    let message = match error.status {
        Some(kind) => format!("{}: {}", kind, error.message),
        None => error.message,
    };
    SendError::Api { status, message }
}
