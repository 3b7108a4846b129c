use chrono::Utc;
use mnemos_core::{MetadataPatch, Record, RecordStatus, RecordStore};
use mnemos_storage::sqlite::queries::record_search::match_expression;
use mnemos_storage::SqliteStore;

#[tokio::test]
async fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mnemos.db");

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        let id = store
            .append(Record::new("tdd red green refactor", "claude_code", Utc::now()))
            .await
            .unwrap();
        store
            .set_metadata(
                &id,
                MetadataPatch::SupersededBy {
                    successor_id: "next".into(),
                    reason: "refined".into(),
                    at: Utc::now(),
                },
            )
            .await
            .unwrap();
        id
    };

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.schema_version().unwrap(), 1);
    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.status(), RecordStatus::Superseded);
    assert_eq!(record.metadata.superseded_by.as_deref(), Some("next"));

    let hits = store.text_search("refactor", "shared_knowledge", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn bm25_ranks_denser_matches_higher() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .append(Record::new("docker docker docker deploy", "s", Utc::now()))
        .await
        .unwrap();
    store
        .append(Record::new(
            "a long note about many things that mentions docker once among other words",
            "s",
            Utc::now(),
        ))
        .await
        .unwrap();
    let hits = store.text_search("docker", "shared_knowledge", 5).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].relevance.unwrap() >= hits[1].relevance.unwrap());
    assert!(hits[0].record.content.starts_with("docker docker"));
}

#[test]
fn match_expression_quotes_every_term() {
    assert_eq!(match_expression("docker deploy").as_deref(), Some("\"docker\" OR \"deploy\""));
    assert_eq!(match_expression("   "), None);
}

#[test]
fn migrations_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.db");
    SqliteStore::open(&path).unwrap();
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.schema_version().unwrap(), 1);
}
