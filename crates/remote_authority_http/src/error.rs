use remote_authority::RemoteError;
use serde::Deserialize;
use thiserror::Error;

/// Failure while configuring or constructing the HTTP client.
///
/// Request-time failures are reported as [`RemoteError`] instead.
#[derive(Debug, Error)]
pub enum HttpAuthorityError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid configuration value for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Extracts the human-readable `error` text from a failure body.
///
/// Only a non-blank string `error` field counts; anything else (empty body,
/// non-JSON, structured error objects) yields `None`.
pub fn parse_error_message(body: &str) -> Option<String> {
    let payload = serde_json::from_str::<ErrorPayload>(body).ok()?;
    match payload.error {
        Some(serde_json::Value::String(message)) if !message.trim().is_empty() => Some(message),
        _ => None,
    }
}

pub(crate) fn transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Transport(format!("request timed out: {error}"))
    } else {
        RemoteError::Transport(error.to_string())
    }
}
