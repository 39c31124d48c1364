//! Checkpoint and write bookkeeping types.

use super::{CheckpointId, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A versioned snapshot of a thread's full message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Identifier assigned on the first write for a thread, stable after.
    pub id: CheckpointId,

    /// Ordered message history. Insertion order is significant.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Monotonically increasing write counter, bumped by the writer on every
    /// successful write. The compaction engine never touches it.
    pub version: u64,

    /// Creation time, preserved across updates.
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Create the first checkpoint of a thread.
    pub fn new(id: CheckpointId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            version: 1,
            created_at: Utc::now(),
        }
    }

    /// Build the successor checkpoint: same id and creation time, the given
    /// message history, and the version bumped by one.
    pub fn next(&self, messages: Vec<Message>) -> Self {
        Self {
            id: self.id.clone(),
            messages,
            version: self.version + 1,
            created_at: self.created_at,
        }
    }

    /// Replace the message history without bumping the version.
    ///
    /// Used when rewriting a checkpoint in flight (compaction); version
    /// accounting stays with the writer.
    pub fn with_messages(&self, messages: Vec<Message>) -> Self {
        Self {
            id: self.id.clone(),
            messages,
            version: self.version,
            created_at: self.created_at,
        }
    }

    /// Number of chat messages (`User`/`Assistant`) in the history.
    pub fn chat_message_count(&self) -> usize {
        crate::compaction::count_chat_messages(&self.messages)
    }
}

/// Origin of a checkpoint write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteSource {
    /// Direct caller input.
    Input,

    /// A completed conversation turn.
    Loop,

    /// An out-of-band update to stored state.
    Update,
}

/// Caller-supplied metadata persisted alongside a checkpoint write.
///
/// Opaque to the compaction layer; forwarded to the store verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Origin of the write.
    pub source: WriteSource,

    /// Step counter within the writer's own lifecycle.
    pub step: u64,

    /// Free-form extras.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
}

impl Default for CheckpointMetadata {
    fn default() -> Self {
        Self {
            source: WriteSource::Input,
            step: 0,
            extra: HashMap::new(),
        }
    }
}

impl CheckpointMetadata {
    /// Metadata for a turn-loop write at the given step.
    pub fn loop_step(step: u64) -> Self {
        Self {
            source: WriteSource::Loop,
            step,
            extra: HashMap::new(),
        }
    }
}

/// A single partial write: an incremental channel update recorded while a
/// task is in flight. Grouped under a caller-supplied task id and never
/// subject to compaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingWrite {
    /// Channel the update targets.
    pub channel: String,

    /// Opaque update payload.
    pub value: Value,
}

/// Per-channel version info forwarded with a full-state write.
pub type ChannelVersions = HashMap<String, u64>;
