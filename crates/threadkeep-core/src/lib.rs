//! # threadkeep-core
//!
//! Data model and compaction policy for threadkeep conversation memory.
//!
//! This crate is pure: it defines the message/checkpoint shapes persisted by
//! the storage layer and the windowing/eviction policy that decides how a
//! long history is folded into condensed summary markers. It performs no I/O
//! and knows nothing about stores or summarizers; the async orchestration
//! lives in `threadkeep-memory`.

pub mod compaction;
pub mod types;

// Re-exports for convenience
pub use compaction::CompactionConfig;
pub use types::*;
