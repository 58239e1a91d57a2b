//! Error types for remote task store operations

use thiserror::Error;

/// Errors from the remote task store.
///
/// The engine treats every variant the same way (a failed call); the split
/// exists for logging and for retry decisions by callers.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// HTTP transport error (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server answered a create without returning the record
    #[error("server did not return the created record")]
    MissingBody,

    /// Store could not be reached
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Build a status error from a code and raw body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Whether retrying the same call might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Unavailable(_) => true,
            Self::Decode(_) | Self::MissingBody => false,
        }
    }
}
