//! In-memory checkpoint store.

use crate::{CheckpointRow, CheckpointStore, ListOptions, Result, WriteAck};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use threadkeep_core::{ChannelVersions, Checkpoint, CheckpointMetadata, PendingWrite, ThreadId};
use tokio::sync::RwLock;

/// Everything stored for one thread.
#[derive(Debug, Default)]
struct ThreadRecord {
    /// Checkpoint history in write order; the last row is the live one.
    rows: Vec<CheckpointRow>,

    /// Partial writes keyed by task id.
    pending: HashMap<String, Vec<PendingWrite>>,
}

/// Process-local checkpoint store. State is lost on restart; intended for
/// tests and as the default backend for short-lived agents.
pub struct MemoryCheckpointStore {
    threads: RwLock<HashMap<String, ThreadRecord>>,
}

impl Default for MemoryCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCheckpointStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
        }
    }

    /// Number of partial writes recorded for a task (test/introspection aid).
    pub async fn pending_write_count(&self, thread: &ThreadId, task_id: &str) -> usize {
        self.threads
            .read()
            .await
            .get(thread.as_str())
            .and_then(|r| r.pending.get(task_id))
            .map_or(0, |w| w.len())
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn get(&self, thread: &ThreadId) -> Result<Option<Checkpoint>> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread.as_str())
            .and_then(|r| r.rows.last())
            .map(|row| row.checkpoint.clone()))
    }

    async fn put(
        &self,
        thread: &ThreadId,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
        _versions: ChannelVersions,
    ) -> Result<WriteAck> {
        let now = Utc::now();
        let version = checkpoint.version;

        let mut threads = self.threads.write().await;
        let record = threads.entry(thread.as_str().to_string()).or_default();
        // The thread keeps its original creation time across every write.
        let created_at = record.rows.first().map_or(now, |r| r.created_at);
        record.rows.push(CheckpointRow {
            checkpoint,
            metadata,
            created_at,
            updated_at: now,
        });

        Ok(WriteAck {
            thread_id: thread.clone(),
            version,
        })
    }

    async fn list(&self, thread: &ThreadId, options: &ListOptions) -> Result<Vec<Checkpoint>> {
        let threads = self.threads.read().await;
        let rows = threads
            .get(thread.as_str())
            .map_or(&[][..], |r| r.rows.as_slice());

        let mut checkpoints: Vec<Checkpoint> = rows
            .iter()
            .rev()
            .map(|row| row.checkpoint.clone())
            .filter(|cp| options.before.map_or(true, |b| cp.version < b))
            .collect();
        if let Some(limit) = options.limit {
            checkpoints.truncate(limit);
        }
        Ok(checkpoints)
    }

    async fn delete_thread(&self, thread: &ThreadId) -> Result<()> {
        self.threads.write().await.remove(thread.as_str());
        Ok(())
    }

    async fn put_writes(
        &self,
        thread: &ThreadId,
        writes: &[PendingWrite],
        task_id: &str,
    ) -> Result<()> {
        let mut threads = self.threads.write().await;
        let record = threads.entry(thread.as_str().to_string()).or_default();
        record
            .pending
            .entry(task_id.to_string())
            .or_default()
            .extend(writes.iter().cloned());
        Ok(())
    }
}
