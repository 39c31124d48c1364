//! Store error types.

use thiserror::Error;

/// Errors that can occur during checkpoint store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Thread ID cannot be mapped to a storage key.
    #[error("Invalid thread id: {0}")]
    InvalidThreadId(String),

    /// Thread not found (for backends that distinguish absence from error).
    #[error("Thread not found: {0}")]
    NotFound(String),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}
