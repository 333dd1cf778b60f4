//! Remote fetch errors.

use thiserror::Error;

/// Errors returned by the API config cache client.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 4xx: bad request or rejected subscription key. Not retried.
    #[error("Error {status} calling the service URL {url}")]
    Client { status: u16, url: String },

    /// 5xx: retried while the backoff budget allows.
    #[error("Error {status} calling the service URL {url}")]
    Service { status: u16, url: String },

    /// Neither success nor a 4xx/5xx error.
    #[error("Unexpected status {status} calling the service URL {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Connection, timeout or body read failure.
    #[error("Transport error calling the service URL {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body is not a valid cache payload.
    #[error("Invalid cache payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Client { status, .. }
            | FetchError::Service { status, .. }
            | FetchError::UnexpectedStatus { status, .. } => Some(*status),
            FetchError::Transport { .. } | FetchError::Decode { .. } => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::Client { .. })
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, FetchError::Service { .. })
    }
}
