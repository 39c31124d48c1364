//! File-backed checkpoint store with JSON persistence.

use crate::{CheckpointRow, CheckpointStore, ListOptions, Result, StoreError, WriteAck};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use threadkeep_core::{ChannelVersions, Checkpoint, CheckpointMetadata, PendingWrite, ThreadId};
use tokio::fs;
use tracing::debug;

/// On-disk document holding everything stored for one thread.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ThreadDocument {
    #[serde(default)]
    rows: Vec<CheckpointRow>,

    #[serde(default)]
    pending: HashMap<String, Vec<PendingWrite>>,
}

/// Checkpoint store persisting one JSON document per thread.
///
/// All mutations are written atomically (write to a `.tmp` sibling, then
/// rename), so a crash mid-write never leaves a torn document behind.
pub struct FileCheckpointStore {
    base_dir: PathBuf,
}

impl FileCheckpointStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily
    /// on the first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Map a thread id onto its document path.
    ///
    /// Ids are flattened to a filesystem-safe name; anything outside
    /// `[A-Za-z0-9_-]` becomes `_`. An id that flattens to nothing (or that
    /// attempts traversal) is rejected.
    fn thread_path(&self, thread: &ThreadId) -> Result<PathBuf> {
        let sanitized: String = thread
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if sanitized.is_empty() || sanitized.chars().all(|c| c == '_') {
            return Err(StoreError::InvalidThreadId(thread.as_str().to_string()));
        }
        Ok(self.base_dir.join(format!("{}.json", sanitized)))
    }

    async fn load(&self, path: &Path) -> Result<ThreadDocument> {
        match fs::read_to_string(path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ThreadDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, path: &Path, document: &ThreadDocument) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "persisted thread document");
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn get(&self, thread: &ThreadId) -> Result<Option<Checkpoint>> {
        let path = self.thread_path(thread)?;
        let document = self.load(&path).await?;
        Ok(document.rows.last().map(|row| row.checkpoint.clone()))
    }

    async fn put(
        &self,
        thread: &ThreadId,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
        _versions: ChannelVersions,
    ) -> Result<WriteAck> {
        let path = self.thread_path(thread)?;
        let now = Utc::now();
        let version = checkpoint.version;

        let mut document = self.load(&path).await?;
        let created_at = document.rows.first().map_or(now, |r| r.created_at);
        document.rows.push(CheckpointRow {
            checkpoint,
            metadata,
            created_at,
            updated_at: now,
        });
        self.save(&path, &document).await?;

        Ok(WriteAck {
            thread_id: thread.clone(),
            version,
        })
    }

    async fn list(&self, thread: &ThreadId, options: &ListOptions) -> Result<Vec<Checkpoint>> {
        let path = self.thread_path(thread)?;
        let document = self.load(&path).await?;

        let mut checkpoints: Vec<Checkpoint> = document
            .rows
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
        let path = self.thread_path(thread)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_writes(
        &self,
        thread: &ThreadId,
        writes: &[PendingWrite],
        task_id: &str,
    ) -> Result<()> {
        let path = self.thread_path(thread)?;
        let mut document = self.load(&path).await?;
        document
            .pending
            .entry(task_id.to_string())
            .or_default()
            .extend(writes.iter().cloned());
        self.save(&path, &document).await
    }
}
