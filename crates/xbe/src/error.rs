//! Error types for the XBE client library.

use std::path::PathBuf;
use thiserror::Error;

use crate::auth::AuthError;

/// Main error type for XBE client operations.
#[derive(Debug, Error)]
pub enum XbeError {
    /// A flag or argument failed validation before any request was made.
    #[error("{0}")]
    Validation(String),

    /// No token could be found for the target API.
    #[error("authentication required. Run 'xbe auth login' first")]
    AuthRequired,

    /// Token lookup failed for a reason other than "not found".
    #[error("token lookup failed: {0}")]
    Auth(String),

    /// The server answered with a non-success status.
    #[error("{method} {path} failed: {status}")]
    Http {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not a valid JSON:API document.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Error reading or writing a local file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing command output.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl XbeError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        XbeError::Validation(message.into())
    }

    /// Raw response body attached to an HTTP error, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            XbeError::Http { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }

    /// True for errors detected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, XbeError::Validation(_))
    }
}

impl From<AuthError> for XbeError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound => XbeError::AuthRequired,
            other => XbeError::Auth(other.to_string()),
        }
    }
}

/// Result type alias for XBE client operations.
pub type Result<T> = std::result::Result<T, XbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_body_only_for_http_errors() {
        let err = XbeError::Http {
            method: "GET".to_string(),
            path: "/v1/brokers".to_string(),
            status: 422,
            body: "{\"errors\":[]}".to_string(),
        };
        assert_eq!(err.response_body(), Some("{\"errors\":[]}"));
        assert_eq!(err.to_string(), "GET /v1/brokers failed: 422");

        let blank = XbeError::Http {
            method: "GET".to_string(),
            path: "/v1/brokers".to_string(),
            status: 500,
            body: "  ".to_string(),
        };
        assert_eq!(blank.response_body(), None);
        assert_eq!(XbeError::validation("x").response_body(), None);
    }

    #[test]
    fn test_auth_not_found_maps_to_auth_required() {
        let err: XbeError = AuthError::NotFound.into();
        assert!(matches!(err, XbeError::AuthRequired));

        let err: XbeError = AuthError::Config("bad file".to_string()).into();
        assert!(matches!(err, XbeError::Auth(_)));
    }
}
