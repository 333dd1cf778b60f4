//! Retry classification.
//!
//! Responses are sorted into a [`StatusClass`] once; the retry loop then
//! branches on that value. Only server errors are retried. Client errors and
//! transport failures surface immediately.

use reqwest::StatusCode;

/// Outcome class of an HTTP response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx.
    Success,
    /// 4xx: malformed request or auth problem.
    ClientError,
    /// 5xx: transient on the remote side.
    ServerError,
    /// Anything else (1xx, 3xx).
    Unexpected,
}

impl StatusClass {
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            StatusClass::Success
        } else if status.is_client_error() {
            StatusClass::ClientError
        } else if status.is_server_error() {
            StatusClass::ServerError
        } else {
            StatusClass::Unexpected
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, StatusClass::ServerError)
    }

    /// Label used in metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
            StatusClass::Unexpected => "other",
        }
    }
}
