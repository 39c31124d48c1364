//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for one ongoing conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Create a new thread ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier of a checkpoint, stable once assigned for a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointId(String);

impl CheckpointId {
    /// Create a checkpoint ID from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh ID for the first checkpoint of a thread.
    pub fn generate(thread: &ThreadId) -> Self {
        Self(format!("{}-{}", thread.as_str(), Uuid::new_v4()))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CheckpointId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CheckpointId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
