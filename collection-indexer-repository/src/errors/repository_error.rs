//! Content repository error types.

use thiserror::Error;

/// Errors from reading or resaving repository records.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("Record not found: {table}#{id}")]
    NotFound { table: String, id: i64 },

    /// Failed to read a snapshot or backing file.
    #[error("IO error: {0}")]
    Io(String),

    /// The snapshot could not be decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// A record could not be saved again.
    #[error("Resave error: {0}")]
    Resave(String),

    /// Backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Create a not found error.
    pub fn not_found(table: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            table: table.into(),
            id,
        }
    }

    /// Create an IO error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a snapshot error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Create a resave error.
    pub fn resave(msg: impl Into<String>) -> Self {
        Self::Resave(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
