//! Error types for the task store.
//!
//! [`TaskStoreError`] is returned by every store operation. Its variants fall
//! into three classes, reported by [`TaskStoreError::kind`]:
//!
//! - **Connection**: the store could not be reached while building the pool.
//! - **Store**: statement execution, row scanning, or pool acquisition failed
//!   after construction. These carry the underlying driver error verbatim.
//! - **Not found**: an update targeted a row that does not exist.

use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// The store could not be reached at construction time.
    #[error("failed to connect to {target}: {message}")]
    Connection {
        /// Connection string the pool was built for.
        target: String,
        /// Underlying failure.
        message: String,
    },

    /// `SQLite` error while executing a statement or scanning a row.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error (exhaustion or a broken connection).
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Requested task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(i64),

    /// Requested label was not found.
    #[error("label not found: {0}")]
    LabelNotFound(String),
}

/// Broad classification of a [`TaskStoreError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreachable at startup.
    Connection,
    /// Query, scan, or connectivity failure during an operation.
    Store,
    /// The targeted row does not exist.
    NotFound,
}

impl TaskStoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Sqlite(_) | Self::Pool(_) => ErrorKind::Store,
            Self::TaskNotFound(_) | Self::LabelNotFound(_) => ErrorKind::NotFound,
        }
    }

    pub(crate) fn connection(target: &str, err: impl std::fmt::Display) -> Self {
        Self::Connection {
            target: target.to_string(),
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for task store results.
pub type Result<T> = std::result::Result<T, TaskStoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
