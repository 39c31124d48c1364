//! Message and role types for conversation history.

use serde::{Deserialize, Serialize};

/// Fixed leading phrase that identifies a `System` message as a
/// condensed-history note.
pub const SUMMARY_MARKER_PREFIX: &str = "Summary of the earlier conversation:";

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A role-tagged unit of conversational content.
///
/// Position within a checkpoint's message sequence is the only ordering;
/// messages carry no individual timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender.
    pub role: Role,

    /// Text content.
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Wrap condensed text as a summary marker.
    pub fn summary(condensed: impl AsRef<str>) -> Self {
        Self::system(format!("{}\n{}", SUMMARY_MARKER_PREFIX, condensed.as_ref()))
    }

    /// Whether this is a chat message (`User` or `Assistant`).
    pub fn is_chat(&self) -> bool {
        matches!(self.role, Role::User | Role::Assistant)
    }

    /// Whether this message is a condensed-history marker.
    ///
    /// Detection is by content convention: any `System` message containing
    /// the marker phrase counts, including ones this crate did not create.
    pub fn is_summary_marker(&self) -> bool {
        self.role == Role::System && self.content.contains(SUMMARY_MARKER_PREFIX)
    }
}
