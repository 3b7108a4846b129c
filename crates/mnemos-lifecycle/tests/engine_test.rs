use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use mnemos_core::config::LifecycleConfig;
use mnemos_core::constants::DEFAULT_GROUP;
use mnemos_core::{ErrorKind, Record, RecordStatus, RecordStore};
use mnemos_lifecycle::{Domain, LifecycleEngine, SearchOptions};
use mnemos_storage::{MemoryStore, StoreOp};
use test_fixtures::{reference_now, RecordBuilder};

fn engine() -> LifecycleEngine<MemoryStore> {
    engine_with(LifecycleConfig::default())
}

fn engine_with(config: LifecycleConfig) -> LifecycleEngine<MemoryStore> {
    LifecycleEngine::new(Arc::new(MemoryStore::new()), config, StdDuration::from_secs(5))
}

async fn seed(engine: &LifecycleEngine<MemoryStore>, record: Record) -> String {
    engine.store().append(record).await.unwrap()
}

// ── Supersession ───────────────────────────────────────────────────────────

#[tokio::test]
async fn superseded_record_still_ranks_below_its_successor() {
    let engine = engine();
    let now = reference_now();
    let old_id = seed(&engine, RecordBuilder::new("deploy with docker compose v1").build()).await;

    let new_id = engine
        .supersede(&old_id, "deploy with docker compose v2", "compose v1 is end of life", now)
        .await
        .unwrap();

    let batch = engine
        .search("docker compose", DEFAULT_GROUP, &SearchOptions::default(), now)
        .await
        .unwrap();
    let order: Vec<&str> = batch.results.iter().map(|s| s.record.id.as_str()).collect();
    assert_eq!(order, vec![new_id.as_str(), old_id.as_str()]);
    assert_eq!(batch.results[0].status_weight, 1.0);
    assert_eq!(batch.results[1].status_weight, 0.3);

    let old = engine.store().peek(&old_id).unwrap();
    assert_eq!(old.content, "deploy with docker compose v1");
    assert_eq!(old.metadata.superseded_by.as_deref(), Some(new_id.as_str()));

    let new = engine.store().peek(&new_id).unwrap();
    assert_eq!(new.metadata.supersedes(), &[old_id.clone()]);
    assert!(new.created_at > old.created_at);
    assert_eq!(new.source, old.source);
}

#[tokio::test]
async fn supersede_of_unknown_id_is_not_found() {
    let err = engine().supersede("nope", "x", "y", reference_now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn supersede_retry_returns_the_same_successor() {
    let engine = engine();
    let old_id = seed(&engine, RecordBuilder::new("use pip").build()).await;

    let first = engine.supersede(&old_id, "use uv", "faster", reference_now()).await.unwrap();
    let second = engine.supersede(&old_id, "use uv", "faster", reference_now()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.store().len(), 2);
}

#[tokio::test]
async fn a_second_different_successor_is_rejected() {
    let engine = engine();
    let old_id = seed(&engine, RecordBuilder::new("use pip").build()).await;
    engine.supersede(&old_id, "use uv", "faster", reference_now()).await.unwrap();

    let err = engine
        .supersede(&old_id, "use poetry", "lockfiles", reference_now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(engine.store().len(), 2);
}

#[tokio::test]
async fn deprecated_records_cannot_be_superseded() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("ftp deploys").build()).await;
    engine.deprecate(&id, "insecure", reference_now()).await.unwrap();

    let err = engine.supersede(&id, "sftp deploys", "secure", reference_now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn historical_records_can_still_be_replaced() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("old deploy notes").aged_days(60.0).build()).await;
    engine
        .search("deploy notes", DEFAULT_GROUP, &SearchOptions::default(), reference_now())
        .await
        .unwrap();
    assert_eq!(engine.store().peek(&id).unwrap().status(), RecordStatus::Historical);

    engine.supersede(&id, "new deploy notes", "rewrite", reference_now()).await.unwrap();
    assert_eq!(engine.store().peek(&id).unwrap().status(), RecordStatus::Superseded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_supersedes_record_one_successor() {
    let engine = Arc::new(engine());
    let old_id = seed(&engine, RecordBuilder::new("use pip").build()).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        let old_id = old_id.clone();
        handles.push(tokio::spawn(async move {
            engine.supersede(&old_id, "use uv", "faster", reference_now()).await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(engine.store().len(), 2);
    assert_eq!(engine.active_locks(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_conflicting_supersedes_have_one_winner() {
    let engine = Arc::new(engine());
    let old_id = seed(&engine, RecordBuilder::new("use pip").build()).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        let old_id = old_id.clone();
        handles.push(tokio::spawn(async move {
            engine
                .supersede(&old_id, &format!("use tool {i}"), "better", reference_now())
                .await
        }));
    }
    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::Validation),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(engine.store().len(), 2);
    let old = engine.store().peek(&old_id).unwrap();
    assert_eq!(old.status(), RecordStatus::Superseded);
}

#[tokio::test]
async fn retry_after_partial_failure_reuses_the_appended_successor() {
    let engine = engine();
    let old_id = seed(&engine, RecordBuilder::new("use pip").build()).await;

    engine.store().faults().fail(StoreOp::SetMetadata);
    let err = engine.supersede(&old_id, "use uv", "faster", reference_now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);
    assert_eq!(engine.store().len(), 2);

    engine.store().faults().heal_all();
    let new_id = engine.supersede(&old_id, "use uv", "faster", reference_now()).await.unwrap();
    assert_eq!(engine.store().len(), 2);
    assert_eq!(
        engine.store().peek(&old_id).unwrap().metadata.superseded_by.as_deref(),
        Some(new_id.as_str())
    );
}

// ── Chains and evolution ───────────────────────────────────────────────────

#[tokio::test]
async fn chain_walks_forward_to_the_head() {
    let engine = engine();
    let now = reference_now();
    let a = seed(&engine, RecordBuilder::new("python packaging with pip").build()).await;
    let b = engine.supersede(&a, "python packaging with poetry", "lockfiles", now).await.unwrap();
    let c = engine
        .supersede(&b, "python packaging with uv", "speed", now + Duration::minutes(1))
        .await
        .unwrap();

    let chain: Vec<String> = engine
        .supersession_chain(&a)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(chain, vec![a.clone(), b.clone(), c.clone()]);

    let tree = engine.memory_evolution("python packaging", DEFAULT_GROUP, now).await.unwrap();
    assert_eq!(tree.successors_of(&a)[0].successor_id, b);
    assert_eq!(tree.successors_of(&b)[0].successor_id, c);
    assert_eq!(tree.successors_of(&b)[0].reason, "speed");
    assert!(tree.successors_of(&c).is_empty());
}

#[tokio::test]
async fn chain_walk_terminates_on_a_cycle() {
    let engine = engine();
    let x = RecordBuilder::new("x").id("x").superseded_by("y").build();
    let y = RecordBuilder::new("y").id("y").superseded_by("x").build();
    seed(&engine, x).await;
    seed(&engine, y).await;

    let chain = engine.supersession_chain("x").await.unwrap();
    assert_eq!(chain.len(), 2);
}

#[tokio::test]
async fn chain_of_unknown_id_is_not_found() {
    let err = engine().supersession_chain("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ── Read-with-reclassification ─────────────────────────────────────────────

#[tokio::test]
async fn search_persists_reclassification() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("tdd kata notes").aged_days(45.0).build()).await;

    let options = SearchOptions::default().with_historical(true);
    let batch = engine.search("tdd kata", DEFAULT_GROUP, &options, reference_now()).await.unwrap();
    assert_eq!(batch.reclassified_ids(), vec![id.as_str()]);
    assert_eq!(batch.results[0].status, RecordStatus::Historical);

    let stored = engine.store().peek(&id).unwrap();
    assert_eq!(stored.status(), RecordStatus::Historical);
    assert!(stored.metadata.status_changed_at.is_some());
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("tdd kata notes").aged_days(45.0).build()).await;

    let options = SearchOptions::default().dry_run();
    let batch = engine.search("tdd kata", DEFAULT_GROUP, &options, reference_now()).await.unwrap();
    assert_eq!(batch.reclassified_ids(), vec![id.as_str()]);
    assert!(batch.results.is_empty());
    assert_eq!(engine.store().peek(&id).unwrap().status(), RecordStatus::Active);
}

#[tokio::test]
async fn reclassification_write_failure_does_not_fail_search() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("tdd kata notes").aged_days(45.0).build()).await;
    engine.store().faults().fail(StoreOp::SetMetadata);

    let batch = engine
        .search("tdd kata", DEFAULT_GROUP, &SearchOptions::default(), reference_now())
        .await
        .unwrap();
    assert_eq!(batch.write_failures, vec![id.clone()]);
    assert_eq!(engine.store().peek(&id).unwrap().status(), RecordStatus::Active);
}

#[tokio::test]
async fn search_store_failure_propagates() {
    let engine = engine();
    engine.store().faults().fail(StoreOp::TextSearch);
    let err = engine
        .search("anything", DEFAULT_GROUP, &SearchOptions::default(), reference_now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);
}

#[tokio::test(start_paused = true)]
async fn slow_store_calls_time_out() {
    let engine = LifecycleEngine::new(
        Arc::new(MemoryStore::new()),
        LifecycleConfig::default(),
        StdDuration::from_millis(50),
    );
    engine.store().faults().set_delay(StdDuration::from_secs(10));
    let err = engine
        .search("anything", DEFAULT_GROUP, &SearchOptions::default(), reference_now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn punctuation_only_query_never_reaches_the_store() {
    let engine = engine();
    engine.store().faults().fail(StoreOp::TextSearch);
    let batch = engine
        .search("@:()", DEFAULT_GROUP, &SearchOptions::default(), reference_now())
        .await
        .unwrap();
    assert!(batch.results.is_empty());
}

// ── Capture, deprecation, cross-domain links ───────────────────────────────

#[tokio::test]
async fn capture_tags_cross_references() {
    let engine = engine();
    let id = engine
        .capture(RecordBuilder::new("Deploy the python service with Docker").build())
        .await
        .unwrap();
    let tags = engine.store().peek(&id).unwrap().metadata.cross_references;
    assert_eq!(
        tags,
        vec!["@computer context", "deployment task", "python project", "@computer development"]
    );
}

#[tokio::test]
async fn cross_references_can_be_disabled() {
    let engine = engine_with(LifecycleConfig {
        enable_cross_references: false,
        ..LifecycleConfig::default()
    });
    let id = engine.capture(RecordBuilder::new("docker deploy").build()).await.unwrap();
    assert!(engine.store().peek(&id).unwrap().metadata.cross_references.is_empty());
}

#[tokio::test]
async fn empty_capture_is_a_validation_error() {
    let err = engine().capture(RecordBuilder::new("   ").build()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn deprecated_records_leave_search() {
    let engine = engine();
    let id = seed(&engine, RecordBuilder::new("friday deploys").build()).await;
    engine.deprecate(&id, "bad practice", reference_now()).await.unwrap();
    engine.deprecate(&id, "still bad", reference_now()).await.unwrap();

    let batch = engine
        .search(
            "friday deploys",
            DEFAULT_GROUP,
            &SearchOptions::default().with_historical(true),
            reference_now(),
        )
        .await
        .unwrap();
    assert!(batch.results.is_empty());

    let err = engine.deprecate("missing", "x", reference_now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn cross_domain_links_match_tags_by_substring() {
    let engine = engine();
    let now = reference_now();
    engine.capture(RecordBuilder::new("docker deploy checklist").build()).await.unwrap();
    engine
        .capture(RecordBuilder::new("weekly review of open projects").source("gtd_coach").build())
        .await
        .unwrap();
    let gone = engine.capture(RecordBuilder::new("docker swarm deploy").build()).await.unwrap();
    engine.deprecate(&gone, "swarm retired", now).await.unwrap();

    let links = engine.cross_domain_links("@COMPUTER", DEFAULT_GROUP, now).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].matched_tags, vec!["@computer context"]);
    assert!(links[0].domains.contains(&Domain::Coding));

    let gtd = engine.cross_domain_links("gtd workflow", DEFAULT_GROUP, now).await.unwrap();
    assert_eq!(gtd.len(), 1);
    assert!(gtd[0].domains.contains(&Domain::Productivity));
    assert!(engine.cross_domain_links("kubernetes", DEFAULT_GROUP, now).await.unwrap().is_empty());
}

#[tokio::test]
async fn cross_domain_links_examine_only_the_newest_records() {
    let engine = engine_with(LifecycleConfig {
        link_scan_limit: 2,
        ..LifecycleConfig::default()
    });
    let now = reference_now();
    let tagged = |content: &str, days: f64| {
        RecordBuilder::new(content)
            .aged_days(days)
            .cross_references(&["@computer context"])
            .build()
    };
    seed(&engine, tagged("old docker notes", 30.0)).await;
    seed(&engine, RecordBuilder::new("weekly review").aged_days(2.0).build()).await;
    seed(&engine, tagged("new docker notes", 1.0)).await;

    let links = engine.cross_domain_links("@computer", DEFAULT_GROUP, now).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].scored.record.content, "new docker notes");
}
