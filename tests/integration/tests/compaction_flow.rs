//! End-to-end compaction behavior through the conversation memory manager.

use std::collections::HashMap;
use std::sync::Arc;
use threadkeep_core::compaction::{count_chat_messages, find_summary_markers, CompactionConfig};
use threadkeep_core::{Checkpoint, CheckpointId, CheckpointMetadata, Message, ThreadId};
use threadkeep_integration_tests::{init_tracing, turns, ScriptedSummarizer};
use threadkeep_memory::ConversationMemory;
use threadkeep_store::{CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};

fn memory_with(
    summarizer: Arc<ScriptedSummarizer>,
    config: CompactionConfig,
) -> ConversationMemory {
    ConversationMemory::with_config(Arc::new(MemoryCheckpointStore::new()), summarizer, config)
}

#[tokio::test]
async fn test_single_pass_splices_marker_after_leading_system() {
    init_tracing();
    // [Sys, U1, A1, U2, A2, U3] with trigger 3: the three newest chat
    // messages fold into one marker placed right after the system prompt;
    // the two older chat messages survive verbatim after it.
    let summarizer = Arc::new(ScriptedSummarizer::new(&["folded tail"]));
    let memory = memory_with(
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(3),
    );
    let thread = ThreadId::new("t1");

    let mut checkpoint = Checkpoint::new(CheckpointId::generate(&thread));
    checkpoint.messages = vec![
        Message::system("You are concise."),
        Message::user("u1"),
        Message::assistant("a1"),
        Message::user("u2"),
        Message::assistant("a2"),
        Message::user("u3"),
    ];
    memory
        .write(&thread, checkpoint, CheckpointMetadata::default(), HashMap::new())
        .await
        .unwrap();

    let history = memory.history(&thread).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].content, "You are concise.");
    assert!(history[1].is_summary_marker());
    assert!(history[1].content.contains("folded tail"));
    assert_eq!(history[2].content, "u1");
    assert_eq!(history[3].content, "a1");
    assert_eq!(summarizer.call_count(), 1);
}

#[tokio::test]
async fn test_marker_count_stays_bounded_over_many_turns() {
    init_tracing();
    // Every turn trips the trigger, so every turn mints a marker; the bound
    // of two keeps only the newest pair, evicting oldest-first.
    let summarizer = Arc::new(ScriptedSummarizer::new(&["s1", "s2", "s3", "s4", "s5"]));
    let memory = memory_with(
        summarizer.clone(),
        CompactionConfig::default()
            .with_trigger_count(2)
            .with_max_markers(2),
    );
    let thread = ThreadId::new("t1");

    for i in 0..5 {
        memory
            .record_turn(&thread, &format!("q{}", i), &format!("a{}", i))
            .await
            .unwrap();
    }

    let history = memory.history(&thread).await.unwrap();
    let markers = find_summary_markers(&history);
    assert_eq!(markers.len(), 2);
    // The two newest condensates survive, in creation order.
    assert!(markers[0].1.content.contains("s4"));
    assert!(markers[1].1.content.contains("s5"));
    // The first condensate was evicted long ago.
    assert!(!history.iter().any(|m| m.content.contains("s1")));
    assert_eq!(summarizer.call_count(), 5);
}

#[tokio::test]
async fn test_chat_count_shrinks_after_compaction() {
    init_tracing();
    let summarizer = Arc::new(ScriptedSummarizer::new(&["condensed"]));
    let memory = memory_with(
        summarizer,
        CompactionConfig::default().with_trigger_count(4),
    );
    let thread = ThreadId::new("t1");

    let mut checkpoint = Checkpoint::new(CheckpointId::generate(&thread));
    checkpoint.messages = turns(5); // 10 chat messages
    memory
        .write(&thread, checkpoint, CheckpointMetadata::default(), HashMap::new())
        .await
        .unwrap();

    let history = memory.history(&thread).await.unwrap();
    let last_marker = find_summary_markers(&history)
        .last()
        .map(|(i, _)| *i)
        .unwrap();
    let tail = &history[last_marker + 1..];
    // Four of the ten chat messages folded away; the rest sit after the
    // marker and count toward the next trigger.
    assert_eq!(count_chat_messages(tail), 6);
    assert!(count_chat_messages(tail) < 10);
}

#[tokio::test]
async fn test_compaction_survives_reopen_with_file_store() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let thread = ThreadId::new("alice:web");
    let config = CompactionConfig::default()
        .with_trigger_count(2)
        .with_max_markers(3);

    {
        let memory = ConversationMemory::with_config(
            Arc::new(FileCheckpointStore::new(dir.path())),
            Arc::new(ScriptedSummarizer::new(&["first pass"])),
            config.clone(),
        );
        memory
            .record_turn(&thread, "plan a trip", "sure, where to?")
            .await
            .unwrap();
    }

    // A fresh manager over the same directory picks up the compacted history
    // and keeps folding on top of it.
    let store = Arc::new(FileCheckpointStore::new(dir.path()));
    let memory = ConversationMemory::with_config(
        store.clone(),
        Arc::new(ScriptedSummarizer::new(&["second pass"])),
        config,
    );

    let history = memory.history(&thread).await.unwrap();
    assert_eq!(find_summary_markers(&history).len(), 1);
    assert!(history[0].content.contains("first pass"));

    memory
        .record_turn(&thread, "somewhere warm", "how about Lisbon?")
        .await
        .unwrap();

    let latest = store.get(&thread).await.unwrap().unwrap();
    let markers = find_summary_markers(&latest.messages);
    assert_eq!(markers.len(), 2);
    assert!(markers[1].1.content.contains("second pass"));
    assert_eq!(latest.version, 2);
}
