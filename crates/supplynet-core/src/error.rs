//! Core domain errors.

use thiserror::Error;

/// Core domain errors for the supply network console.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A session feed line could not be decoded.
    #[error("Malformed session event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    /// A tool result referenced a call that was never announced.
    #[error("Tool call not found: {0}")]
    ToolCallNotFound(String),

    /// The state feed has no writer left.
    #[error("State feed closed")]
    FeedClosed,

    /// Reading or writing the session feed failed.
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),
}
