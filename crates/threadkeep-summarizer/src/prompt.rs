//! Condensation prompt construction.

use crate::SummarizeOptions;

/// Build the system instructions for condensing a conversation transcript.
pub fn build_instructions(options: &SummarizeOptions) -> String {
    format!(
        "You condense a chat conversation between a user and an assistant.\n\
         IMPORTANT:\n\
         - Keep ALL important facts: names, preferences, decisions, agreements\n\
         - Keep chronological context where it matters for understanding\n\
         - Condense to at most {} words\n\
         - Format: one short, precise paragraph without bullet points\n\
         - Ignore small talk; focus on the substantive points",
        options.max_words
    )
}

/// Extra instruction emitted when the caller supplied focus topics.
pub fn build_focus(topics: &str) -> String {
    format!("Focus especially on the following topics:\n{}", topics)
}
