//! Durable keyed storage for conversation checkpoints.
//!
//! This crate defines the [`CheckpointStore`] contract the compaction layer
//! decorates, plus two reference adapters:
//! - [`MemoryCheckpointStore`]: process-local, for tests and defaults
//! - [`FileCheckpointStore`]: JSON-per-thread persistence with atomic writes
//!
//! Any backend satisfying the contract (key-value, document, SQL) can stand
//! in; the compaction layer treats stored state as opaque.

pub mod error;
mod file_store;
mod memory_store;

pub use error::StoreError;
pub use file_store::FileCheckpointStore;
pub use memory_store::MemoryCheckpointStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threadkeep_core::{ChannelVersions, Checkpoint, CheckpointMetadata, PendingWrite, ThreadId};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Acknowledgement returned after a successful checkpoint write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    /// Thread the checkpoint was written to.
    pub thread_id: ThreadId,

    /// Version of the stored checkpoint.
    pub version: u64,
}

/// Options for listing stored checkpoints.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of checkpoints to return.
    pub limit: Option<usize>,

    /// Only return checkpoints with version strictly below this value.
    pub before: Option<u64>,
}

/// A checkpoint as persisted: the snapshot plus write bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRow {
    /// The stored snapshot.
    pub checkpoint: Checkpoint,

    /// Metadata supplied with the write.
    pub metadata: CheckpointMetadata,

    /// When the thread's first checkpoint was written; preserved across
    /// subsequent writes.
    pub created_at: DateTime<Utc>,

    /// When this row was written.
    pub updated_at: DateTime<Utc>,
}

/// Durable keyed storage for conversation checkpoints.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Latest checkpoint for a thread, if any.
    async fn get(&self, thread: &ThreadId) -> Result<Option<Checkpoint>>;

    /// Persist a full checkpoint for a thread.
    async fn put(
        &self,
        thread: &ThreadId,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
        versions: ChannelVersions,
    ) -> Result<WriteAck>;

    /// Stored checkpoints for a thread, newest first. The result is finite
    /// and each call starts over from the store's current state.
    async fn list(&self, thread: &ThreadId, options: &ListOptions) -> Result<Vec<Checkpoint>>;

    /// Delete a thread and everything stored for it. Deleting an absent
    /// thread is a no-op.
    async fn delete_thread(&self, thread: &ThreadId) -> Result<()>;

    /// Record partial writes for an in-flight task. These are bookkeeping
    /// updates, not full snapshots; the compaction layer passes them through
    /// untouched.
    async fn put_writes(
        &self,
        thread: &ThreadId,
        writes: &[PendingWrite],
        task_id: &str,
    ) -> Result<()>;
}
