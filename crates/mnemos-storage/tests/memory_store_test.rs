use std::time::Duration;

use chrono::Utc;
use mnemos_core::{ErrorKind, Record, RecordStore};
use mnemos_storage::{MemoryStore, StoreOp};

#[tokio::test]
async fn injected_failure_is_collaborator_unavailable() {
    let store = MemoryStore::new();
    store.faults().fail(StoreOp::TextSearch);
    let err = store.text_search("x", "shared_knowledge", 5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);

    store.faults().heal(StoreOp::TextSearch);
    assert!(store.text_search("x", "shared_knowledge", 5).await.is_ok());
}

#[tokio::test]
async fn failure_is_per_operation() {
    let store = MemoryStore::new();
    store.faults().fail(StoreOp::SetMetadata);
    let id = store.append(Record::new("a", "s", Utc::now())).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_some());
    assert_eq!(store.append_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn delay_applies_before_each_call() {
    let store = MemoryStore::new();
    store.faults().set_delay(Duration::from_secs(2));
    let started = tokio::time::Instant::now();
    store.get("x").await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));

    store.faults().heal_all();
    let started = tokio::time::Instant::now();
    store.get("x").await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn relevance_is_fraction_of_terms_matched() {
    let store = MemoryStore::new();
    store
        .append(Record::new("docker deploy", "s", Utc::now()))
        .await
        .unwrap();
    store.append(Record::new("docker only", "s", Utc::now())).await.unwrap();
    let hits = store
        .text_search("docker deploy", "shared_knowledge", 10)
        .await
        .unwrap();
    assert_eq!(hits[0].relevance, Some(1.0));
    assert_eq!(hits[1].relevance, Some(0.5));
}
