//! Common type definitions for messages, checkpoints, and identifiers.

mod checkpoint;
mod identifiers;
mod message;

pub use checkpoint::{
    ChannelVersions, Checkpoint, CheckpointMetadata, PendingWrite, WriteSource,
};
pub use identifiers::{CheckpointId, ThreadId};
pub use message::{Message, Role, SUMMARY_MARKER_PREFIX};
