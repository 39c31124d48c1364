//! # threadkeep-memory
//!
//! Durable, turn-by-turn conversational state with automatic compaction.
//!
//! [`ConversationMemory`] decorates any [`CheckpointStore`]
//! (`threadkeep-store`): on every full-state write it runs the
//! [`CompactionEngine`], which folds runs of chat messages into condensed
//! summary markers once a thread's unsummarized tail grows past the
//! configured trigger, and bounds the number of retained markers by evicting
//! the oldest. Reads, listings, deletes, and partial writes pass through the
//! store untouched.
//!
//! Compaction is intentionally lossy: once a run of messages is folded into
//! a marker, the originals are gone.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use threadkeep_core::ThreadId;
//! use threadkeep_memory::ConversationMemory;
//! use threadkeep_store::MemoryCheckpointStore;
//! use threadkeep_summarizer::OpenAiSummarizer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryCheckpointStore::new());
//! let summarizer = Arc::new(OpenAiSummarizer::from_env()?);
//! let memory = ConversationMemory::new(store, summarizer);
//!
//! let thread = ThreadId::new("alice:web");
//! memory.record_turn(&thread, "Hello!", "Hi, how can I help?").await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`CheckpointStore`]: threadkeep_store::CheckpointStore

mod engine;
pub mod error;
mod manager;
mod serialized;

pub use engine::CompactionEngine;
pub use error::{MemoryError, Result};
pub use manager::ConversationMemory;
pub use serialized::SerializedMemory;
