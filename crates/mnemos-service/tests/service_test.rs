use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use mnemos_core::{
    BehavioralSignal, ErrorKind, MnemosConfig, RecordStatus, RecordStore, SignalCategory,
    SignalOutcome, SignalPolicy,
};
use mnemos_observability::{
    CascadeEvent, CascadeKind, ObservabilityEngine, RecoveryStatus, SamplingContext,
};
use mnemos_service::{CaptureRequest, FailureKind, MemoryService, OperationOutcome, SearchRequest};
use mnemos_storage::{MemoryStore, StoreOp};
use test_fixtures::{reference_now, RecordBuilder};

fn config() -> MnemosConfig {
    let mut config = MnemosConfig::default();
    config.sampling.seed = Some(7);
    config
}

fn service() -> MemoryService<MemoryStore> {
    service_with(config())
}

fn service_with(config: MnemosConfig) -> MemoryService<MemoryStore> {
    let observability = Arc::new(ObservabilityEngine::new_at(
        config.cascade.clone(),
        config.sampling.clone(),
        reference_now(),
    ));
    MemoryService::with_observability(Arc::new(MemoryStore::new()), config, observability).unwrap()
}

fn signals(command: bool, test: bool, task: bool) -> Vec<BehavioralSignal> {
    let policy = SignalPolicy::canonical();
    vec![
        policy.signal(SignalCategory::CommandSuccess, SignalOutcome::Bool(command)).unwrap(),
        policy.signal(SignalCategory::TestResult, SignalOutcome::Bool(test)).unwrap(),
        policy.signal(SignalCategory::TaskCompletion, SignalOutcome::Bool(task)).unwrap(),
    ]
}

// ── Construction ───────────────────────────────────────────────────────────

#[test]
fn invalid_config_is_a_configuration_error() {
    let mut config = config();
    config.lifecycle.decay_factor = 1.5;
    let err = MemoryService::new(Arc::new(MemoryStore::new()), config).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

// ── Capture ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn capture_with_signals_writes_the_score_in_one_append() {
    let service = service();
    let id = service
        .capture(
            CaptureRequest::new("run migrations before seeding")
                .with_signals(signals(true, false, true)),
            reference_now(),
        )
        .await
        .unwrap();

    let record = service.store().peek(&id).unwrap();
    let score = record.metadata.behavioral.unwrap();
    assert!((score.value - 0.7).abs() < 1e-9);
    assert_eq!(score.signal_breakdown.len(), 3);
    assert_eq!(record.group, service.config().service.group_id);
    assert_eq!(service.store().append_count(), 1);
}

#[tokio::test]
async fn capture_with_invalid_signals_writes_nothing() {
    let service = service();
    let bad = vec![BehavioralSignal::new(
        SignalCategory::TestResult,
        SignalOutcome::Bool(true),
        2.0,
    )];
    let err = service
        .capture(CaptureRequest::new("flaky").with_signals(bad), reference_now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn capture_store_failure_is_a_hard_failure() {
    let service = service();
    service.store().faults().fail(StoreOp::Append);

    let outcome = service
        .capture_outcome(CaptureRequest::new("cache the build"), reference_now())
        .await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::CollaboratorUnavailable));
    assert!(service.degradations().is_empty());
}

#[tokio::test]
async fn attach_score_refines_an_existing_record() {
    let service = service();
    let id = service.capture(CaptureRequest::new("lint in CI"), reference_now()).await.unwrap();
    assert!(service.store().peek(&id).unwrap().metadata.behavioral.is_none());

    let score = service
        .attach_score(&id, &signals(true, true, true), reference_now())
        .await
        .unwrap();
    assert!((score.value - 1.0).abs() < 1e-9);
    assert_eq!(service.store().len(), 1);
    assert_eq!(service.scoring_report(reference_now()).scores_attached, 1);
}

// ── Search ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_ranks_successor_above_superseded() {
    let service = service();
    let now = reference_now();
    let old = service.capture(CaptureRequest::new("deploy with fabric"), now).await.unwrap();
    let new = service
        .supersede(
            &old,
            "deploy with ansible",
            "fabric is unmaintained",
            now + Duration::minutes(1),
        )
        .await
        .unwrap();

    let response = service
        .search(&SearchRequest::new("deploy"), now + Duration::minutes(2))
        .await
        .unwrap();
    assert!(!response.degraded);
    let ids: Vec<&str> = response.data.results.iter().map(|r| r.record.id.as_str()).collect();
    assert_eq!(ids, vec![new.as_str(), old.as_str()]);
    assert_eq!(response.data.results[1].status, RecordStatus::Superseded);
}

#[tokio::test]
async fn search_store_failure_degrades_to_empty_results() {
    let service = service();
    service.capture(CaptureRequest::new("use ripgrep"), reference_now()).await.unwrap();
    service.store().faults().fail(StoreOp::TextSearch);

    let response = service.search(&SearchRequest::new("ripgrep"), reference_now()).await.unwrap();
    assert!(response.degraded);
    assert!(response.data.results.is_empty());

    let degradations = service.degradations();
    assert_eq!(degradations.len(), 1);
    assert_eq!(degradations[0].event.component, "record_store");
    assert_eq!(degradations[0].event.operation, "search");
    assert_eq!(degradations[0].event.fallback_used, "empty_results");

    service.store().faults().heal(StoreOp::TextSearch);
    let response = service.search(&SearchRequest::new("ripgrep"), reference_now()).await.unwrap();
    assert!(!response.degraded);
    assert_eq!(response.data.results.len(), 1);
    assert_eq!(service.degradations()[0].recovery_status, RecoveryStatus::Recovered);
}

#[tokio::test(start_paused = true)]
async fn search_timeout_degrades_instead_of_hanging() {
    let mut config = config();
    config.service.store_timeout_ms = 50;
    let service = service_with(config);
    service.store().faults().set_delay(StdDuration::from_secs(10));

    let response = service.search(&SearchRequest::new("anything"), reference_now()).await.unwrap();
    assert!(response.degraded);
    assert!(service.degradations()[0].event.failure.contains("timed out"));
}

#[tokio::test]
async fn reclassification_write_failure_keeps_the_search() {
    let service = service();
    let now = reference_now();
    let stale = RecordBuilder::new("old docker notes").relative_to(now).aged_days(45.0).build();
    let id = service.store().append(stale).await.unwrap();
    service.store().faults().fail(StoreOp::SetMetadata);

    let response = service
        .search(&SearchRequest::new("docker").include_historical(true), now)
        .await
        .unwrap();
    assert!(!response.degraded);
    assert_eq!(response.data.write_failures, vec![id.clone()]);
    assert_eq!(service.degradations()[0].event.operation, "reclassify");
    assert_eq!(service.store().peek(&id).unwrap().status(), RecordStatus::Active);
}

#[tokio::test]
async fn source_filter_and_limit_apply() {
    let service = service();
    let now = reference_now();
    for i in 0..4 {
        service
            .capture(CaptureRequest::new(format!("weekly review {i}")).with_source("gtd"), now)
            .await
            .unwrap();
    }
    service.capture(CaptureRequest::new("weekly review code"), now).await.unwrap();

    let response = service
        .search(&SearchRequest::new("weekly review").filter_source("gtd").limit(2), now)
        .await
        .unwrap();
    assert_eq!(response.data.results.len(), 2);
    assert!(response.data.results.iter().all(|r| r.record.source == "gtd"));
}

// ── Other reads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cross_domain_links_degrade_on_scan_failure() {
    let service = service();
    service
        .capture(CaptureRequest::new("deploy the python service with docker"), reference_now())
        .await
        .unwrap();

    let links = service.cross_domain_links("deployment", reference_now()).await.unwrap();
    assert_eq!(links.data.len(), 1);

    service.store().faults().fail(StoreOp::Scan);
    let links = service.cross_domain_links("deployment", reference_now()).await.unwrap();
    assert!(links.degraded);
    assert!(links.data.is_empty());
}

#[tokio::test]
async fn memory_evolution_follows_supersession() {
    let service = service();
    let now = reference_now();
    let old = service.capture(CaptureRequest::new("format with black"), now).await.unwrap();
    let new = service
        .supersede(&old, "format with ruff", "one tool", now + Duration::minutes(1))
        .await
        .unwrap();

    let tree = service.memory_evolution("format", now + Duration::minutes(2)).await.unwrap();
    assert!(!tree.degraded);
    let steps = tree.data.successors_of(&old);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].successor_id, new);
}

// ── Write outcomes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn supersede_unknown_id_is_a_not_found_outcome() {
    let outcome = service().supersede_outcome("ghost", "x", "y", reference_now()).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::NotFound));
    assert!(!outcome.is_ok());
}

#[tokio::test]
async fn deprecated_record_leaves_search() {
    let service = service();
    let id = service.capture(CaptureRequest::new("use tabs"), reference_now()).await.unwrap();
    assert!(service.deprecate_outcome(&id, "style guide changed", reference_now()).await.is_ok());

    let response = service.search(&SearchRequest::new("tabs"), reference_now()).await.unwrap();
    assert!(response.data.results.is_empty());
}

#[test]
fn outcome_serializes_with_a_discriminant() {
    let failed: OperationOutcome<String> =
        OperationOutcome::Failed(FailureKind::NotFound, "record not found: x".into());
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        serde_json::json!({ "outcome": "failed", "value": ["not_found", "record not found: x"] })
    );
    let ok = OperationOutcome::Ok("id-1".to_string());
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        serde_json::json!({ "outcome": "ok", "value": "id-1" })
    );
}

// ── Observability ──────────────────────────────────────────────────────────

#[tokio::test]
async fn operations_report_themselves_to_the_sampler() {
    let service = service();
    service.capture(CaptureRequest::new("cargo nextest"), reference_now()).await.unwrap();
    service.search(&SearchRequest::new("nextest"), reference_now()).await.unwrap();

    assert_eq!(service.sampling_stats(reference_now()).decisions_in_window, 2);
}

#[tokio::test]
async fn routine_fast_traffic_does_not_escalate_sampling() {
    let service = service();
    let now = reference_now();
    for i in 0..52 {
        let at = now + Duration::milliseconds(500 * i);
        service.search(&SearchRequest::new("deploy"), at).await.unwrap();
    }

    let at = now + Duration::seconds(26);
    let cascades = service.cascade_statistics(at);
    assert!(cascades.by_kind.contains_key(&CascadeKind::BatchOverflow));
    let stats = service.sampling_stats(at);
    assert_eq!(stats.level, 0);
    assert!((stats.probability - stats.base_rate).abs() < 1e-12);
}

#[tokio::test]
async fn self_monitoring_can_be_disabled() {
    let mut config = config();
    config.service.self_monitoring = false;
    let service = service_with(config);
    service.capture(CaptureRequest::new("cargo nextest"), reference_now()).await.unwrap();

    assert_eq!(service.sampling_stats(reference_now()).decisions_in_window, 0);
}

#[test]
fn critical_cascade_fully_escalates_sampling() {
    let service = service();
    let now = reference_now();
    let mut verdict = None;
    for (i, secs) in [12.0, 13.0, 14.0].into_iter().enumerate() {
        let at = now + Duration::seconds(i as i64);
        verdict = service.record_operation_event(CascadeEvent::new("search", secs, at));
    }
    let verdict = verdict.unwrap();
    assert!(verdict.is_critical);

    let at = now + Duration::seconds(5);
    for _ in 0..20 {
        assert!(service.should_sample(&SamplingContext::new("search"), at));
    }
    let stats = service.sampling_stats(at);
    assert_eq!(stats.level, stats.max_level);
}
