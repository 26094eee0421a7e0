//! # Client Error Types
//!
//! Error types for everything that talks to the API or the session cache.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │      API        │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Transport      │  │  Api            │  │  Decode                 │ │
//! │  │  Timeout        │  │  Validation     │  │  Cache                  │ │
//! │  │                 │  │  (422 + fields) │  │  Config / InvalidUrl    │ │
//! │  │                 │  │                 │  │  NotAuthenticated       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores copy the [`ErrorPayload`] of `Api`/`Validation` failures into their
//! `errors` field and log the rest, then hand the error back. Nothing retries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Structured error body returned by the API.
///
/// ```json
/// { "message": "The given data was invalid.",
///   "errors": { "email": ["The email has already been taken."] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorPayload {
    /// Parses a response body, keeping raw text as the message when the body
    /// is not the usual JSON shape.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ErrorPayload>(body) {
            Ok(payload) => payload,
            Err(_) if body.trim().is_empty() => ErrorPayload::default(),
            Err(_) => ErrorPayload {
                message: Some(body.trim().to_string()),
                errors: BTreeMap::new(),
            },
        }
    }

    pub fn has_field_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("no message"))
    }
}

/// Client error covering every failure a store can surface.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // API Errors
    // =========================================================================
    /// Non-2xx response.
    #[error("API error ({status}): {payload}")]
    Api { status: u16, payload: ErrorPayload },

    /// Non-2xx response carrying field-level messages.
    #[error("Validation failed ({status}): {payload}")]
    Validation { status: u16, payload: ErrorPayload },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// A 2xx body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Reading or writing the session cache failed.
    #[error("Session cache error: {0}")]
    Cache(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The operation needs a bearer token and the session has none.
    #[error("Not authenticated")]
    NotAuthenticated,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Cache(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-2xx response.
    ///
    /// 422 responses and any body with field `errors` are validation errors.
    pub fn from_status(status: u16, body: &str) -> Self {
        let payload = ErrorPayload::from_body(body);
        if status == 422 || payload.has_field_errors() {
            ClientError::Validation { status, payload }
        } else {
            ClientError::Api { status, payload }
        }
    }

    /// The server-provided payload, when there is one.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ClientError::Api { payload, .. } | ClientError::Validation { payload, .. } => {
                Some(payload)
            }
            _ => None,
        }
    }

    /// HTTP status, for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Validation { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Field-level messages of a validation failure.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ClientError::Validation { payload, .. } => Some(&payload.errors),
            _ => None,
        }
    }

    /// True for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout)
    }
}
