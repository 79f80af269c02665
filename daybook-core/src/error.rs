//! Error types for the daybook core.

use thiserror::Error;

/// Errors that can occur in daybook operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaybookError {
    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Event service error: {0}")]
    Transport(String),

    #[error("No active store context")]
    NoActiveContext,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DaybookError {
    /// Whether the backing repository could not be reached or answered unexpectedly.
    pub fn is_transport(&self) -> bool {
        matches!(self, DaybookError::Transport(_))
    }
}

impl From<reqwest::Error> for DaybookError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DaybookError::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            DaybookError::Transport(format!("unexpected response body: {err}"))
        } else {
            DaybookError::Transport(err.to_string())
        }
    }
}

impl From<config::ConfigError> for DaybookError {
    fn from(err: config::ConfigError) -> Self {
        DaybookError::Config(err.to_string())
    }
}

/// Result type alias for daybook operations.
pub type DaybookResult<T> = Result<T, DaybookError>;
