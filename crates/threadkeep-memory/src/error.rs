//! Error types for conversation memory operations.

use thiserror::Error;
use threadkeep_store::StoreError;
use threadkeep_summarizer::SummarizerError;

/// Result type for conversation memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors surfaced to callers of the conversation memory manager.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The underlying checkpoint store failed. Propagated unchanged; the
    /// manager adds no retry policy of its own.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Summarization failed or timed out. The write was aborted before
    /// anything reached the store; the caller may retry the whole write.
    #[error("Summarization error: {0}")]
    Summarizer(#[from] SummarizerError),
}
