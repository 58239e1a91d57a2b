//! Error types for the board synchronization engine

use crate::remote::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// The remote task store rejected or failed a call
    #[error("remote task store error: {0}")]
    Remote(#[from] RemoteError),

    /// Invalid field value (unknown column, status or priority name)
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Card not present on the local board
    #[error("card not found on board: {id}")]
    CardNotFound { id: String },

    /// Explicit configuration file does not exist
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration could not be extracted
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl BoardError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a card-not-found error
    pub fn card_not_found(id: impl Into<String>) -> Self {
        Self::CardNotFound { id: id.into() }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_retryable())
    }
}

impl From<figment::Error> for BoardError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}
