//! Error types for data sources.

use thiserror::Error;

/// Errors that can occur when fetching monitoring data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend did not accept the session (HTTP 401).
    #[error("Not logged in")]
    Unauthorized,

    /// The session lacks a role on the project (HTTP 403).
    #[error("Permission denied")]
    Forbidden,

    /// Unknown project or endpoint (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status.
    #[error("API returned status {0}")]
    Status(u16),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The backend answered with `ok: false`.
    #[error("Request rejected: {0}")]
    Api(String),

    /// Local fixture could not be read.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// True for authentication and authorization failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Unauthorized | FetchError::Forbidden)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl From<tracker_types::ApiRejection> for FetchError {
    fn from(err: tracker_types::ApiRejection) -> Self {
        FetchError::Api(err.message)
    }
}
