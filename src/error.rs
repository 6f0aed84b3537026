// Error types for the table store.
// Covers transport failures, remote status errors, and local precondition violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row index {index} out of range (rows: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item with id {0} not found")]
    ItemNotFound(i64),

    #[error("Row {index} has no id")]
    MissingId { index: usize },

    #[error("Could not determine a configuration directory")]
    MissingConfig,

    #[error("{0}")]
    Other(String),
}

impl TableError {
    /// Whether this error came from the transport or payload rather than local state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TableError::Http(_) | TableError::Status { .. } | TableError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
