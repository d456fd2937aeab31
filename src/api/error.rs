//! Error types for backend calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Error returned by every backend call.
///
/// `context` is the short message shown to the user for that call (for example
/// "Failed to load menu"); the local state it would have changed is left as is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: server responded with {status}")]
    Status {
        context: &'static str,
        status: StatusCode,
    },

    #[error("{context}: unexpected response body: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("{0} is unavailable")]
    Unavailable(&'static str),
}

impl ApiError {
    pub fn is_status(&self, expected: StatusCode) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == expected)
    }
}
