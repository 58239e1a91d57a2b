//! Errors surfaced by CLI commands

use taskboard_sync::BoardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The confirmation prompt could not be shown
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
