use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::errors::SendError;

/// Body of an FCM HTTP v1 `messages:send` call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendRequest {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub validate_only: bool,
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Message {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Visible notification with an optional data payload.
pub fn compose_notification(
    device_token: &str,
    title: &str,
    body: &str,
    image: Option<&str>,
    data: Option<BTreeMap<String, String>>,
    dry_run: bool,
) -> SendRequest {
    SendRequest {
        validate_only: dry_run,
        message: Message {
            token: device_token.to_owned(),
            notification: Some(Notification {
                title: title.to_owned(),
                body: body.to_owned(),
                image: image.map(str::to_owned),
            }),
            data,
        },
    }
}

/// Silent message carrying only `data`.
pub fn compose_data_only(device_token: &str, data: BTreeMap<String, String>, dry_run: bool) -> SendRequest {
    SendRequest {
        validate_only: dry_run,
        message: Message {
            token: device_token.to_owned(),
            notification: None,
            data: Some(data),
        },
    }
}

/// Parse a JSON object into FCM data. FCM only accepts string values, so
/// anything else is sent as its JSON text.
pub fn parse_data(json: &str, flag: &str) -> Result<BTreeMap<String, String>, SendError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SendError::InvalidPayload(format!("Invalid JSON in {}: {}", flag, e)))?;

    let Value::Object(object) = value else {
        return Err(SendError::InvalidPayload(format!("{} must be a JSON object", flag)));
    };

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}
