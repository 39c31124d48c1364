//! The conversation memory manager: a compacting decorator over any store.

use crate::{CompactionEngine, Result};
use std::collections::HashMap;
use std::sync::Arc;
use threadkeep_core::compaction::CompactionConfig;
use threadkeep_core::{
    ChannelVersions, Checkpoint, CheckpointId, CheckpointMetadata, Message, PendingWrite, ThreadId,
};
use threadkeep_store::{CheckpointStore, ListOptions, WriteAck};
use threadkeep_summarizer::Summarizer;
use tracing::warn;

/// Durable conversation memory with automatic history compaction.
///
/// Wraps an arbitrary [`CheckpointStore`]: full-state writes run through the
/// [`CompactionEngine`] first, everything else passes through untouched.
/// The manager keeps no checkpoint cache (every operation round-trips the
/// store) and holds only its two injected dependencies plus the tuning
/// parameters.
///
/// Concurrent writes to the *same* thread are not serialized here; the later
/// write to reach the store wins. Callers needing strict per-thread ordering
/// can wrap the manager in [`SerializedMemory`](crate::SerializedMemory).
pub struct ConversationMemory {
    store: Arc<dyn CheckpointStore>,
    engine: CompactionEngine,
}

impl ConversationMemory {
    /// Create a manager with default compaction parameters.
    pub fn new(store: Arc<dyn CheckpointStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self::with_config(store, summarizer, CompactionConfig::default())
    }

    /// Create a manager with explicit compaction parameters.
    pub fn with_config(
        store: Arc<dyn CheckpointStore>,
        summarizer: Arc<dyn Summarizer>,
        config: CompactionConfig,
    ) -> Self {
        Self {
            store,
            engine: CompactionEngine::new(summarizer, config),
        }
    }

    /// The active compaction parameters.
    pub fn config(&self) -> &CompactionConfig {
        self.engine.config()
    }

    /// Persist a full checkpoint for a thread, compacting its history first.
    ///
    /// An empty message list is forwarded unchanged with a warning; a
    /// malformed checkpoint is treated as "no messages", not as an error.
    /// If summarization fails the store is never called and the thread's
    /// previously stored checkpoint stays untouched.
    pub async fn write(
        &self,
        thread: &ThreadId,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
        versions: ChannelVersions,
    ) -> Result<WriteAck> {
        if checkpoint.messages.is_empty() {
            warn!(thread = %thread, "writing checkpoint with no messages");
            return Ok(self.store.put(thread, checkpoint, metadata, versions).await?);
        }

        let checkpoint = match self.engine.compact(&checkpoint).await? {
            Some(messages) => checkpoint.with_messages(messages),
            None => checkpoint,
        };
        Ok(self.store.put(thread, checkpoint, metadata, versions).await?)
    }

    /// Latest checkpoint for a thread. Reads never consult the engine.
    pub async fn read(&self, thread: &ThreadId) -> Result<Option<Checkpoint>> {
        Ok(self.store.get(thread).await?)
    }

    /// Stored checkpoints for a thread, newest first. Pass-through.
    pub async fn list(
        &self,
        thread: &ThreadId,
        options: &ListOptions,
    ) -> Result<Vec<Checkpoint>> {
        Ok(self.store.list(thread, options).await?)
    }

    /// Delete a thread. Pass-through.
    pub async fn delete(&self, thread: &ThreadId) -> Result<()> {
        Ok(self.store.delete_thread(thread).await?)
    }

    /// Record partial writes for an in-flight task. Pass-through: partial
    /// writes carry no complete message list, so they are never compacted.
    pub async fn write_partial(
        &self,
        thread: &ThreadId,
        writes: &[PendingWrite],
        task_id: &str,
    ) -> Result<()> {
        Ok(self.store.put_writes(thread, writes, task_id).await?)
    }

    /// Message history of the latest checkpoint, empty when none exists.
    pub async fn history(&self, thread: &ThreadId) -> Result<Vec<Message>> {
        Ok(self
            .read(thread)
            .await?
            .map(|cp| cp.messages)
            .unwrap_or_default())
    }

    /// Record one completed conversation turn.
    ///
    /// Loads the latest checkpoint (or starts a fresh one on the first turn),
    /// appends the user and assistant messages, bumps the version, and writes
    /// the result back with compaction applied on the way out. The checkpoint id
    /// and creation time are assigned once and preserved after.
    ///
    /// A turn with an empty assistant response is not persisted; `None` is
    /// returned.
    pub async fn record_turn(
        &self,
        thread: &ThreadId,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Option<WriteAck>> {
        if assistant_text.is_empty() {
            return Ok(None);
        }

        let next = match self.store.get(thread).await? {
            Some(prev) => {
                let mut messages = prev.messages.clone();
                messages.push(Message::user(user_text));
                messages.push(Message::assistant(assistant_text));
                prev.next(messages)
            }
            None => {
                let mut first = Checkpoint::new(CheckpointId::generate(thread));
                first.messages = vec![
                    Message::user(user_text),
                    Message::assistant(assistant_text),
                ];
                first
            }
        };

        let metadata = CheckpointMetadata::loop_step(next.version);
        let versions: ChannelVersions =
            HashMap::from([("messages".to_string(), next.messages.len() as u64)]);
        let ack = self.write(thread, next, metadata, versions).await?;
        Ok(Some(ack))
    }
}
