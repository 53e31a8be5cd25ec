//! Error types for the Obsidian REST client
//!
//! Every operation returns one of a closed set of error kinds. Transport and
//! HTTP status outcomes are folded into that set by [`normalize_response`];
//! argument problems are reported as [`Error::Validation`] before any request
//! is made.

use crate::transport::{ApiResponse, TransportError};
use serde::Deserialize;
use thiserror::Error;

/// Obsidian REST error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Caller input rejected before reaching the network
    #[error("{0}")]
    Validation(String),

    /// HTTP 401 from the API
    #[error("Authentication failed. Check your API key.")]
    Authentication,

    /// HTTP 404 from the API
    #[error("File not found: {0}")]
    NotFound(String),

    /// Any other non-2xx status
    #[error("[{}] {message}", reported_code(.status, .code))]
    Remote {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// DNS, refused connection, timeout
    #[error("Failed to connect to Obsidian API at {0}")]
    Connection(String),

    /// Anything that fits nowhere else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for Obsidian REST operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Stable name of the error kind, as reported to tool callers
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationFailure",
            Error::Authentication => "AuthenticationFailure",
            Error::NotFound(_) => "NotFound",
            Error::Remote { .. } => "RemoteError",
            Error::Connection(_) => "ConnectionFailure",
            Error::Unexpected(_) => "UnexpectedError",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(format!("invalid JSON: {}", err))
    }
}

/// Error body returned by the Local REST API on failures
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteErrorBody {
    message: Option<String>,
    error_code: Option<i64>,
}

/// Fold the outcome of a single request into the error taxonomy.
///
/// `base_url` is reported on connection failures, `resource` (the
/// vault-relative path, not the encoded URL) on 404s.
pub fn normalize_response(
    outcome: std::result::Result<ApiResponse, TransportError>,
    base_url: &str,
    resource: &str,
) -> Result<ApiResponse> {
    let response = match outcome {
        Ok(response) => response,
        Err(TransportError::Connect(_)) | Err(TransportError::Timeout) => {
            return Err(Error::Connection(base_url.to_string()));
        }
        Err(TransportError::Other(message)) => return Err(Error::Unexpected(message)),
    };

    match response.status {
        200..=299 => Ok(response),
        401 => Err(Error::Authentication),
        404 => Err(Error::NotFound(resource.to_string())),
        status => Err(remote_error(status, &response.body)),
    }
}

fn reported_code(status: &u16, code: &Option<i64>) -> i64 {
    code.unwrap_or(i64::from(*status))
}

fn remote_error(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<RemoteErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.error_code);
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| status_line(status));

    Error::Remote {
        status,
        code,
        message,
    }
}

fn status_line(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| status.to_string())
}
