//! Summarization boundary for threadkeep.
//!
//! The compaction layer treats summarization as a black-box text-to-text
//! function under a word budget. This crate defines that contract
//! ([`Summarizer`]) and ships [`OpenAiSummarizer`], an implementation against
//! any OpenAI-compatible chat-completions endpoint.

pub mod error;
mod openai;
pub mod prompt;

pub use error::SummarizerError;
pub use openai::OpenAiSummarizer;

use async_trait::async_trait;

/// Result type for summarizer operations.
pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Options forwarded with each summarize call.
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    /// Upper bound on the condensed text, in words.
    pub max_words: usize,

    /// Topics the condensation should concentrate on, if any.
    pub focus: Option<String>,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            max_words: 150,
            focus: None,
        }
    }
}

impl SummarizeOptions {
    /// Options with the given word budget.
    pub fn with_max_words(max_words: usize) -> Self {
        Self {
            max_words,
            focus: None,
        }
    }

    /// Add focus topics.
    pub fn focus(mut self, topics: impl Into<String>) -> Self {
        self.focus = Some(topics.into());
        self
    }
}

/// A text-to-text condensation function under a word budget.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense a role-prefixed conversation transcript.
    ///
    /// Implementations must not fail on empty input (return an empty
    /// condensate instead); transport or model failures surface as
    /// [`SummarizerError`] and abort the caller's compaction attempt.
    async fn summarize(&self, transcript: &str, options: &SummarizeOptions) -> Result<String>;
}
