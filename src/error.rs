// error.rs
use thiserror::Error;

/// Errors surfaced by the deck and its extensions.
///
/// Option conflicts are not listed: they are resolved by the first-writer
/// merge and only logged.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The slide has no root identity (nested under a slide that is itself
    /// not a root, or outside the classification).
    #[error("slide {0} has no root position")]
    ClassificationMiss(usize),

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("deck already initialized")]
    AlreadyInitialized,

    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },
}

impl DeckError {
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}
