//! History log error types

use thiserror::Error;

/// History-related errors
#[derive(Error, Debug)]
pub enum HistoryError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Entries could not be serialized
    #[error("Failed to serialize history: {0}")]
    SerializeError(#[from] serde_json::Error),
}
