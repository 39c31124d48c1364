//! Splice-and-evict: rewriting a history around a freshly minted marker.

use super::scan::find_summary_markers;
use crate::types::{Message, Role};

/// Remove the collected window from `messages`, splice `marker` in, and evict
/// the oldest marker once the retained bound is exceeded.
///
/// `window` must hold strictly increasing indices into `messages` (as
/// produced by [`select_window`](super::select_window)). The marker lands
/// immediately after the last surviving marker or, when none survives,
/// after the leading run of `System` messages and before the first chat
/// message. At most one marker is evicted per pass, the earliest-occurring
/// one.
pub fn splice_summary(
    messages: &[Message],
    window: &[usize],
    marker: Message,
    max_markers: usize,
) -> Vec<Message> {
    // Drop the collected window by index; everything else keeps its order.
    let mut remaining: Vec<Message> = Vec::with_capacity(messages.len() + 1 - window.len());
    let mut window_iter = window.iter().copied().peekable();
    for (i, msg) in messages.iter().enumerate() {
        if window_iter.peek() == Some(&i) {
            window_iter.next();
        } else {
            remaining.push(msg.clone());
        }
    }

    // Markers shifted when the window came out; re-locate them before splicing.
    let insert_at = match find_summary_markers(&remaining).last().map(|(i, _)| *i) {
        Some(last_marker) => last_marker + 1,
        None => remaining
            .iter()
            .position(|m| m.role != Role::System)
            .unwrap_or(remaining.len()),
    };
    remaining.insert(insert_at, marker);

    let oldest = {
        let markers = find_summary_markers(&remaining);
        if markers.len() > max_markers {
            markers.first().map(|(i, _)| *i)
        } else {
            None
        }
    };
    if let Some(index) = oldest {
        remaining.remove(index);
    }

    remaining
}
