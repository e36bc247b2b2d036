//! Error model shared by every client in this crate.
//!
//! Callers only ever see [`ClientError`]. Its [`ErrorKind`] tells local
//! validation failures, HTTP/transport failures and mock lookups apart without
//! matching on message text.

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Backend explanation attached to a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// A JSON object with optional `message`, `code` and free-form `details`.
    Structured {
        message: Option<String>,
        code: Option<String>,
        details: Option<Value>,
    },
    /// Anything else, kept as raw text.
    Text { text: String },
}

impl ErrorPayload {
    /// Best-effort decoding of an error body: JSON first, raw text otherwise.
    /// An empty body yields no payload.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut map)) => Some(ErrorPayload::Structured {
                message: take_string(&mut map, "message"),
                code: take_string(&mut map, "code"),
                details: map.remove("details"),
            }),
            Ok(Value::String(text)) => Some(ErrorPayload::Text { text }),
            Ok(_) | Err(_) => {
                let text = String::from_utf8_lossy(body).into_owned();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(ErrorPayload::Text { text })
                }
            }
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ErrorPayload::Text { text: text.into() }
    }
}

fn take_string(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Picks the display message for a failed call: the structured `message` when
/// present (even if empty), then the raw text payload, then the HTTP status text.
pub fn select_message(status_text: &str, payload: Option<&ErrorPayload>) -> String {
    match payload {
        Some(ErrorPayload::Structured {
            message: Some(message),
            ..
        }) => message.clone(),
        Some(ErrorPayload::Text { text }) => text.clone(),
        _ => status_text.to_string(),
    }
}

/// HTTP-level failure: a non-success status, an unexpected content type, an
/// undecodable body, or (with status 0) a failure to reach the server at all.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
    pub payload: Option<ErrorPayload>,
    message: String,
}

impl ApiError {
    pub fn new(status: u16, status_text: impl Into<String>, payload: Option<ErrorPayload>) -> Self {
        let status_text = status_text.into();
        let message = select_message(&status_text, payload.as_ref());
        Self {
            status,
            status_text,
            payload,
            message,
        }
    }

    /// The request never produced a response.
    pub fn network(reason: impl Into<String>) -> Self {
        Self::new(0, "Network Error", Some(ErrorPayload::text(reason)))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Rejected locally before any request was sent.
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error(transparent)]
    Transport(#[from] ApiError),
    /// Only produced by the mock backend.
    #[error("{entity} with id \"{id}\" not found in mock dataset.")]
    NotFound { entity: &'static str, id: String },
}

impl ClientError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation { .. } => ErrorKind::Validation,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
