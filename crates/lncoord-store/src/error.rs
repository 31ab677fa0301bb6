//! Error types for the storage layer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while preparing the database directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another process holds the database file and the lock wait timed out.
    #[error("timed out waiting for the database file lock on {path}")]
    LockTimeout {
        /// The contended database file.
        path: PathBuf,
    },

    /// A stored record could not be interpreted.
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    /// The store has been closed and accepts no further work.
    #[error("store is closed")]
    Closed,

    /// The shared connection lock was poisoned by a panicking thread.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Create an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        StoreError::InvalidRecord(msg.into())
    }
}
