//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// The vote engine itself never fails: rejected operations are reported as
/// `false`. These errors only surface while parsing host input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Unknown game mode: {0}")]
    UnknownGameMode(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl DomainError {
    /// Check if this error came from parsing a command line
    pub fn is_command_error(&self) -> bool {
        matches!(self, DomainError::UnknownCommand(_))
    }
}
