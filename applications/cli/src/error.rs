//! CLI error types
use encore_core::EncoreError;
use encore_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Library(#[from] EncoreError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// A command was refused; the text goes back to the user verbatim
    #[error("{0}")]
    Rejected(String),
}

impl CliError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
