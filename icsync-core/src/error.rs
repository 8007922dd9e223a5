//! Error types for icsync.

use thiserror::Error;

/// Errors that can occur while reading feeds or syncing a calendar.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Event has no UID")]
    MissingIdentifier,

    #[error("Could not parse {field} timestamp '{value}'")]
    UnparseableTimestamp { field: &'static str, value: String },

    #[error("Event UID '{0}' has no letters or digits")]
    EmptyIdentifier(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for icsync operations.
pub type SyncResult<T> = Result<T, SyncError>;
