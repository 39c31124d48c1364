//! Opt-in per-thread write serialization.

use crate::Result;
use crate::manager::ConversationMemory;
use dashmap::DashMap;
use std::sync::Arc;
use threadkeep_core::{
    ChannelVersions, Checkpoint, CheckpointMetadata, Message, PendingWrite, ThreadId,
};
use threadkeep_store::{ListOptions, WriteAck};
use tokio::sync::Mutex;

/// Serializes writes per thread on top of a [`ConversationMemory`].
///
/// The bare manager lets racing writes to the same thread read-modify-write
/// independently, so the later one to reach the store wins and can drop the
/// other side's compaction result. This wrapper holds one async mutex per
/// thread id: writes and recorded turns for the same thread run one at a
/// time, unrelated threads proceed concurrently, and reads stay lock-free.
///
/// Lock entries are kept for the life of the wrapper.
pub struct SerializedMemory {
    inner: Arc<ConversationMemory>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SerializedMemory {
    /// Wrap a manager.
    pub fn new(inner: Arc<ConversationMemory>) -> Self {
        Self {
            inner,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, thread: &ThreadId) -> Arc<Mutex<()>> {
        self.locks
            .entry(thread.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Serialized counterpart of [`ConversationMemory::write`].
    pub async fn write(
        &self,
        thread: &ThreadId,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
        versions: ChannelVersions,
    ) -> Result<WriteAck> {
        let lock = self.lock_for(thread);
        let _guard = lock.lock().await;
        self.inner.write(thread, checkpoint, metadata, versions).await
    }

    /// Serialized counterpart of [`ConversationMemory::record_turn`].
    pub async fn record_turn(
        &self,
        thread: &ThreadId,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Option<WriteAck>> {
        let lock = self.lock_for(thread);
        let _guard = lock.lock().await;
        self.inner.record_turn(thread, user_text, assistant_text).await
    }

    /// Pass-through read.
    pub async fn read(&self, thread: &ThreadId) -> Result<Option<Checkpoint>> {
        self.inner.read(thread).await
    }

    /// Pass-through history read.
    pub async fn history(&self, thread: &ThreadId) -> Result<Vec<Message>> {
        self.inner.history(thread).await
    }

    /// Pass-through listing.
    pub async fn list(
        &self,
        thread: &ThreadId,
        options: &ListOptions,
    ) -> Result<Vec<Checkpoint>> {
        self.inner.list(thread, options).await
    }

    /// Thread deletion, serialized with that thread's writes.
    pub async fn delete(&self, thread: &ThreadId) -> Result<()> {
        let lock = self.lock_for(thread);
        let _guard = lock.lock().await;
        self.inner.delete(thread).await
    }

    /// Pass-through partial write.
    pub async fn write_partial(
        &self,
        thread: &ThreadId,
        writes: &[PendingWrite],
        task_id: &str,
    ) -> Result<()> {
        self.inner.write_partial(thread, writes, task_id).await
    }
}
