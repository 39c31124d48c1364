//! Scanning primitives and window selection.

use crate::types::{Message, Role};

/// Count the messages with role `User` or `Assistant`.
///
/// `System` messages, summary markers included, never count toward the
/// compaction trigger.
pub fn count_chat_messages(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.is_chat()).count()
}

/// Ordered positions of every summary marker in `messages`.
pub fn find_summary_markers(messages: &[Message]) -> Vec<(usize, &Message)> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_summary_marker())
        .collect()
}

/// Select the window of chat messages to fold into the next summary.
///
/// Only the tail strictly after the most recent marker is considered. Returns
/// `None` when that tail holds fewer than `trigger_count` chat messages (the
/// common case, kept cheap) or when nothing could be collected. Otherwise
/// returns the absolute indices of the `trigger_count` most recent chat
/// messages in the tail, in chronological order.
///
/// Selecting the most recent window rather than the oldest unsummarized one
/// means older tail messages stay verbatim and end up *after* the spliced
/// note. That ordering is intentional and matched by tests; see the
/// repository design notes before changing it.
pub fn select_window(messages: &[Message], trigger_count: usize) -> Option<Vec<usize>> {
    let tail_start = find_summary_markers(messages)
        .last()
        .map_or(0, |(i, _)| i + 1);
    let tail = &messages[tail_start..];

    if count_chat_messages(tail) < trigger_count {
        return None;
    }

    let mut indices = Vec::with_capacity(trigger_count);
    for (offset, msg) in tail.iter().enumerate().rev() {
        if indices.len() == trigger_count {
            break;
        }
        if msg.is_chat() {
            indices.push(tail_start + offset);
        }
    }
    if indices.is_empty() {
        return None;
    }
    indices.reverse();
    Some(indices)
}

/// Render the selected messages as a role-prefixed transcript for
/// summarization.
pub fn render_transcript(messages: &[Message], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| {
            let msg = &messages[i];
            format!("{}: {}", role_label(msg.role), msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}
