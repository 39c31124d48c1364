//! Windowing and eviction policy for conversation compaction.
//!
//! Pure functions only: deciding *when* a run of chat messages should be
//! folded into a condensed note, *which* messages make up that run, and
//! *where* the note is spliced back into the ordered history. Producing the
//! condensed text is the summarizer's job and happens upstream, in
//! `threadkeep-memory`.

mod scan;
mod splice;

pub use scan::{count_chat_messages, find_summary_markers, render_transcript, select_window};
pub use splice::splice_summary;

use serde::{Deserialize, Serialize};

/// Tuning parameters for the compaction policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionConfig {
    /// Chat-message count in the tail that triggers a compaction pass.
    #[serde(default = "default_trigger_count")]
    pub trigger_count: usize,

    /// Maximum number of summary markers retained in a history.
    #[serde(default = "default_max_markers")]
    pub max_markers: usize,

    /// Word budget forwarded to the summarizer.
    #[serde(default = "default_word_budget")]
    pub summary_word_budget: usize,
}

fn default_trigger_count() -> usize {
    12
}

fn default_max_markers() -> usize {
    7
}

fn default_word_budget() -> usize {
    150
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            trigger_count: default_trigger_count(),
            max_markers: default_max_markers(),
            summary_word_budget: default_word_budget(),
        }
    }
}

impl CompactionConfig {
    /// Override the chat-message count that triggers compaction.
    pub fn with_trigger_count(mut self, count: usize) -> Self {
        self.trigger_count = count;
        self
    }

    /// Override the retained-marker bound.
    pub fn with_max_markers(mut self, max: usize) -> Self {
        self.max_markers = max;
        self
    }

    /// Override the summarizer word budget.
    pub fn with_summary_word_budget(mut self, words: usize) -> Self {
        self.summary_word_budget = words;
        self
    }
}
