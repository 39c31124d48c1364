//! Pass-through purity and failure semantics of the memory manager.

use std::collections::HashMap;
use std::sync::Arc;
use threadkeep_core::compaction::CompactionConfig;
use threadkeep_core::{Checkpoint, CheckpointId, CheckpointMetadata, Message, PendingWrite, ThreadId};
use threadkeep_integration_tests::{init_tracing, turns, FailingSummarizer, ScriptedSummarizer};
use threadkeep_memory::{ConversationMemory, MemoryError};
use threadkeep_store::{CheckpointStore, ListOptions, MemoryCheckpointStore};

/// Seed the bare store with a long history, bypassing the manager.
async fn seed_store(store: &MemoryCheckpointStore, thread: &ThreadId, n_turns: usize) -> Checkpoint {
    let mut checkpoint = Checkpoint::new(CheckpointId::generate(thread));
    checkpoint.messages = turns(n_turns);
    store
        .put(
            thread,
            checkpoint.clone(),
            CheckpointMetadata::default(),
            HashMap::new(),
        )
        .await
        .unwrap();
    checkpoint
}

#[tokio::test]
async fn test_list_never_summarizes_regardless_of_history_size() {
    init_tracing();
    let store = Arc::new(MemoryCheckpointStore::new());
    let summarizer = Arc::new(ScriptedSummarizer::new(&["unused"]));
    let memory = ConversationMemory::with_config(
        store.clone(),
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(1),
    );
    let thread = ThreadId::new("t1");
    seed_store(&store, &thread, 50).await;

    let listed = memory.list(&thread, &ListOptions::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].messages.len(), 100);
    assert_eq!(summarizer.call_count(), 0);
}

#[tokio::test]
async fn test_reads_return_exactly_what_the_store_holds() {
    init_tracing();
    let store = Arc::new(MemoryCheckpointStore::new());
    let summarizer = Arc::new(ScriptedSummarizer::new(&["unused"]));
    let memory = ConversationMemory::with_config(
        store.clone(),
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(1),
    );
    let thread = ThreadId::new("t1");
    let seeded = seed_store(&store, &thread, 20).await;

    let read_back = memory.read(&thread).await.unwrap().unwrap();
    assert_eq!(read_back.messages, seeded.messages);
    assert_eq!(summarizer.call_count(), 0);
}

#[tokio::test]
async fn test_partial_writes_and_delete_bypass_the_engine() {
    init_tracing();
    let store = Arc::new(MemoryCheckpointStore::new());
    let summarizer = Arc::new(ScriptedSummarizer::new(&["unused"]));
    let memory = ConversationMemory::with_config(
        store.clone(),
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(1),
    );
    let thread = ThreadId::new("t1");
    seed_store(&store, &thread, 10).await;

    memory
        .write_partial(
            &thread,
            &[PendingWrite {
                channel: "messages".into(),
                value: serde_json::json!({"append": "draft"}),
            }],
            "task-7",
        )
        .await
        .unwrap();
    assert_eq!(store.pending_write_count(&thread, "task-7").await, 1);

    memory.delete(&thread).await.unwrap();
    assert!(memory.read(&thread).await.unwrap().is_none());
    assert_eq!(summarizer.call_count(), 0);
}

#[tokio::test]
async fn test_failed_compaction_preserves_previous_checkpoint() {
    init_tracing();
    let store = Arc::new(MemoryCheckpointStore::new());
    let summarizer = Arc::new(FailingSummarizer::new());
    let memory = ConversationMemory::with_config(
        store.clone(),
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(6),
    );
    let thread = ThreadId::new("t1");

    // First write sits below the trigger and lands.
    let first = Checkpoint::new(CheckpointId::generate(&thread)).next(turns(2));
    memory
        .write(&thread, first.clone(), CheckpointMetadata::default(), HashMap::new())
        .await
        .unwrap();

    // Second write trips the trigger; the summarizer dies; nothing changes.
    let second = first.next(turns(4));
    let err = memory
        .write(&thread, second, CheckpointMetadata::default(), HashMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryError::Summarizer(_)));
    assert_eq!(summarizer.call_count(), 1);

    let stored = memory.read(&thread).await.unwrap().unwrap();
    assert_eq!(stored.version, first.version);
    assert_eq!(stored.messages, first.messages);
}

#[tokio::test]
async fn test_empty_checkpoint_write_skips_the_engine() {
    init_tracing();
    let summarizer = Arc::new(ScriptedSummarizer::new(&["unused"]));
    let memory = ConversationMemory::with_config(
        Arc::new(MemoryCheckpointStore::new()),
        summarizer.clone(),
        CompactionConfig::default().with_trigger_count(1),
    );
    let thread = ThreadId::new("t1");

    let empty = Checkpoint::new(CheckpointId::generate(&thread));
    memory
        .write(&thread, empty, CheckpointMetadata::default(), HashMap::new())
        .await
        .unwrap();

    assert!(memory.history(&thread).await.unwrap().is_empty());
    assert_eq!(summarizer.call_count(), 0);
}
