//! Compaction engine: async orchestration around the pure policy.

use crate::Result;
use std::sync::Arc;
use threadkeep_core::compaction::{self, CompactionConfig};
use threadkeep_core::{Checkpoint, Message};
use threadkeep_summarizer::{SummarizeOptions, Summarizer};
use tracing::{debug, info};

/// Rewrites checkpoint histories according to the windowing/eviction policy.
///
/// The engine is a pure function of its input checkpoint plus one summarizer
/// call: it either returns a complete replacement message list or nothing.
/// Version and id bookkeeping stay with the writer.
pub struct CompactionEngine {
    summarizer: Arc<dyn Summarizer>,
    config: CompactionConfig,
}

impl CompactionEngine {
    /// Create an engine with the given summarizer and tuning parameters.
    pub fn new(summarizer: Arc<dyn Summarizer>, config: CompactionConfig) -> Self {
        Self { summarizer, config }
    }

    /// The active tuning parameters.
    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }

    /// Decide whether `checkpoint` needs compaction and produce the rewritten
    /// message list if so.
    ///
    /// Returns `Ok(None)` when the history is below the trigger; this is the
    /// common case and costs one marker scan and no I/O. A summarizer failure
    /// aborts the attempt with an error; a partially rewritten list is never
    /// produced.
    pub async fn compact(&self, checkpoint: &Checkpoint) -> Result<Option<Vec<Message>>> {
        let messages = &checkpoint.messages;
        let window = match compaction::select_window(messages, self.config.trigger_count) {
            Some(window) => window,
            None => {
                debug!(checkpoint = %checkpoint.id, "below compaction trigger");
                return Ok(None);
            }
        };

        let transcript = compaction::render_transcript(messages, &window);
        let options = SummarizeOptions::with_max_words(self.config.summary_word_budget);
        let condensed = self.summarizer.summarize(&transcript, &options).await?;
        let marker = Message::summary(condensed);

        let rewritten =
            compaction::splice_summary(messages, &window, marker, self.config.max_markers);
        info!(
            checkpoint = %checkpoint.id,
            removed = window.len(),
            remaining = rewritten.len(),
            "compacted conversation history"
        );
        Ok(Some(rewritten))
    }
}
