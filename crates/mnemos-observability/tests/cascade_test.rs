use chrono::{DateTime, Duration, TimeZone, Utc};
use mnemos_core::config::CascadeConfig;
use mnemos_observability::cascade::{classify, mitigations_for};
use mnemos_observability::{CascadeDetector, CascadeEvent, CascadeKind, OperationKind};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

fn slow(op: &str, duration: f64, secs: i64) -> CascadeEvent {
    CascadeEvent::new(op, duration, at(secs))
}

// ── Latency propagation ────────────────────────────────────────────────────

#[test]
fn three_slow_operations_trigger_on_the_third() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());

    assert!(detector.record_event(slow("search", 5.1, 0)).is_none());
    assert!(detector.record_event(slow("search", 5.1, 10)).is_none());
    let verdict = detector
        .record_event(slow("search", 5.1, 20))
        .expect("third slow event should classify");

    assert_eq!(verdict.kind, CascadeKind::LatencyPropagation);
    assert_eq!(verdict.events.len(), 3);
    assert!(!verdict.is_critical);
    assert_eq!(verdict.start, at(0));
    assert_eq!(verdict.end, at(20));
    assert!((verdict.max_latency - 5.1).abs() < 1e-9);
    assert!(verdict.pattern_id.starts_with("cascade_"));
}

#[test]
fn doubled_latency_is_critical() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("extract", 12.0, 0));
    detector.record_event(slow("extract", 13.0, 1));
    let verdict = detector.record_event(slow("extract", 14.0, 2)).unwrap();
    assert_eq!(verdict.kind, CascadeKind::LatencyPropagation);
    assert!(verdict.is_critical);
}

#[test]
fn decreasing_latency_breaks_the_run() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("search", 9.0, 0));
    detector.record_event(slow("search", 8.0, 1));
    assert!(detector.record_event(slow("search", 7.0, 2)).is_none());
}

#[test]
fn events_outside_the_window_do_not_count() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("search", 6.0, 0));
    detector.record_event(slow("search", 6.5, 1));
    assert!(detector.record_event(slow("search", 7.0, 120)).is_none());
    assert_eq!(detector.buffered(), 1);
}

#[test]
fn buffer_is_bounded() {
    let config = CascadeConfig {
        max_buffered_events: 5,
        ..CascadeConfig::default()
    };
    let mut detector = CascadeDetector::new(config);
    for i in 0..10 {
        detector.record_event(slow("noop", 0.1, i));
    }
    assert_eq!(detector.buffered(), 5);
}

// ── Other patterns and precedence ──────────────────────────────────────────

#[test]
fn rising_memory_takes_precedence_over_latency() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("ingest", 6.0, 0).with_memory(20.0, 72.0));
    detector.record_event(slow("ingest", 7.0, 1).with_memory(20.0, 75.0));
    let verdict = detector
        .record_event(slow("ingest", 8.0, 2).with_memory(20.0, 78.0))
        .unwrap();
    assert_eq!(verdict.kind, CascadeKind::MemoryExhaustion);
    assert!(!verdict.is_critical);
    assert!((verdict.total_memory_impact - 60.0).abs() < 1e-9);
}

#[test]
fn memory_past_critical_percent_is_critical() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("ingest", 0.5, 0).with_memory(5.0, 80.0));
    detector.record_event(slow("ingest", 0.5, 1).with_memory(5.0, 86.0));
    let verdict = detector
        .record_event(slow("ingest", 0.5, 2).with_memory(5.0, 92.0))
        .unwrap();
    assert_eq!(verdict.kind, CascadeKind::MemoryExhaustion);
    assert!(verdict.is_critical);
}

#[test]
fn long_remote_call_is_an_llm_timeout() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("search", 1.0, 0));
    detector.record_event(slow("search", 1.0, 1));
    let verdict = detector
        .record_event(slow("extract", 35.0, 2).with_kind(OperationKind::RemoteCall))
        .unwrap();
    assert_eq!(verdict.kind, CascadeKind::LlmTimeout);
    assert_eq!(verdict.events.len(), 1);
    assert!(!verdict.is_critical);
    assert!(verdict.mitigations.iter().any(|m| m == "Review timeout configurations"));
}

#[test]
fn remote_call_at_twice_the_long_call_threshold_is_critical() {
    let config = CascadeConfig::default();
    let doubled = config.long_call_threshold_seconds * config.critical_exceedance;
    let mut detector = CascadeDetector::new(config);
    detector.record_event(slow("search", 1.0, 0));
    detector.record_event(slow("search", 1.0, 1));
    let verdict = detector
        .record_event(slow("extract", doubled + 1.0, 2).with_kind(OperationKind::RemoteCall))
        .unwrap();
    assert_eq!(verdict.kind, CascadeKind::LlmTimeout);
    assert!(verdict.is_critical);
}

#[test]
fn long_local_call_is_not_an_llm_timeout() {
    let config = CascadeConfig::default();
    let window = vec![
        slow("search", 1.0, 0),
        slow("search", 1.0, 1),
        slow("extract", 35.0, 2),
    ];
    let classified = classify(&window, &config);
    assert!(classified.map_or(true, |c| c.kind != CascadeKind::LlmTimeout));
}

#[test]
fn waits_with_flat_memory_are_semaphore_starvation() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("embed_batch", 3.0, 0).with_kind(OperationKind::Queued));
    detector.record_event(slow("embed_batch", 3.0, 1).with_kind(OperationKind::Queued));
    let verdict = detector
        .record_event(slow("embed_batch", 3.0, 2).with_kind(OperationKind::Queued))
        .unwrap();
    assert_eq!(verdict.kind, CascadeKind::SemaphoreStarvation);
    assert!(!verdict.is_critical);
    assert_eq!(verdict.affected_operations.len(), 1);
}

#[test]
fn too_many_events_is_a_batch_overflow() {
    let config = CascadeConfig::default();
    let mut detector = CascadeDetector::new(config.clone());
    let mut verdicts = Vec::new();
    for i in 0..=config.batch_limit as i64 {
        if let Some(v) = detector.record_event(slow(&format!("op{}", i % 7), 0.1, i)) {
            verdicts.push(v);
        }
    }
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].kind, CascadeKind::BatchOverflow);
    assert!(!verdicts[0].is_critical);
    assert!(verdicts[0]
        .mitigations
        .iter()
        .any(|m| m == "Consider operation isolation or queuing"));
}

#[test]
fn batch_overflow_turns_critical_at_twice_the_limit() {
    let config = CascadeConfig {
        batch_limit: 5,
        ..CascadeConfig::default()
    };
    let mut detector = CascadeDetector::new(config);
    let verdicts: Vec<_> = (0..10)
        .filter_map(|i| detector.record_event(slow(&format!("op{i}"), 0.1, i)))
        .collect();

    assert_eq!(verdicts.len(), 5);
    assert!(verdicts.iter().all(|v| v.kind == CascadeKind::BatchOverflow));
    assert!(verdicts[..4].iter().all(|v| !v.is_critical));
    assert!(verdicts[4].is_critical);
}

#[test]
fn below_min_events_never_classifies() {
    let config = CascadeConfig::default();
    let window = vec![slow("a", 50.0, 0).with_kind(OperationKind::RemoteCall), slow("a", 50.0, 1)];
    assert!(classify(&window, &config).is_none());
}

// ── Severity and mitigations ───────────────────────────────────────────────

#[test]
fn severity_tiers_add_up() {
    let event = slow("x", 11.0, 0).with_memory(600.0, 85.0).with_error("boom");
    assert_eq!(event.severity(), 10.0);

    assert_eq!(slow("x", 5.5, 0).severity(), 2.0);
    assert_eq!(slow("x", 2.5, 0).with_memory(150.0, 75.0).severity(), 3.0);
    assert_eq!(slow("x", 1.0, 0).severity(), 0.0);
}

#[test]
fn mitigations_include_shape_driven_extras() {
    let plain = mitigations_for(CascadeKind::SemaphoreStarvation, 0.0, 1.0, 1);
    assert_eq!(plain.len(), 3);

    let heavy = mitigations_for(CascadeKind::LlmTimeout, 600.0, 25.0, 6);
    assert_eq!(heavy.len(), 7);
    assert!(heavy.iter().any(|m| m.contains("memory profiling")));
}

#[test]
fn kinds_serialize_screaming_snake_case() {
    let json = serde_json::to_string(&CascadeKind::LatencyPropagation).unwrap();
    assert_eq!(json, "\"LATENCY_PROPAGATION\"");
    assert_eq!(CascadeKind::LlmTimeout.to_string(), "LLM_TIMEOUT");
}

// ── Active tracking, statistics, risk ──────────────────────────────────────

#[test]
fn severe_trigger_stays_active_until_twice_the_window() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("extract", 12.0, 0).with_memory(150.0, 10.0));
    detector.record_event(slow("extract", 13.0, 1).with_memory(150.0, 10.0));
    let verdict = detector
        .record_event(slow("extract", 14.0, 2).with_memory(150.0, 10.0))
        .unwrap();

    let active = detector.active_cascades(at(3));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].pattern_id, verdict.pattern_id);

    assert!(detector.active_cascades(at(200)).is_empty());
    let history = detector.history(at(-10), Some(CascadeKind::LatencyPropagation));
    assert_eq!(history.len(), 1);
}

#[test]
fn statistics_summarize_completed_verdicts() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("search", 5.1, 0));
    detector.record_event(slow("search", 5.1, 10));
    detector.record_event(slow("search", 5.1, 20));

    let stats = detector.statistics(at(30));
    assert_eq!(stats.active_cascades, 0);
    assert_eq!(stats.completed_cascades_24h, 1);
    assert_eq!(stats.by_kind.get(&CascadeKind::LatencyPropagation), Some(&1));
    assert!((stats.avg_duration_seconds - 20.0).abs() < 1e-9);
    assert!((stats.avg_severity - 2.0).abs() < 1e-9);
}

#[test]
fn risk_combines_pressure_latency_and_errors() {
    let detector = CascadeDetector::new(CascadeConfig::default());
    let quiet = detector.predict_risk(10.0, 0.5, 0.0, at(0));
    assert_eq!(quiet.score, 0.0);
    assert!(quiet.predicted.is_none());

    let risk = detector.predict_risk(85.0, 5.0, 0.5, at(0));
    assert!((risk.score - 0.8).abs() < 1e-9);
    assert_eq!(risk.predicted, Some(CascadeKind::MemoryExhaustion));

    let capped = detector.predict_risk(100.0, 50.0, 1.0, at(0));
    assert!(capped.score <= 1.0);
}

#[test]
fn recent_history_raises_risk() {
    let mut detector = CascadeDetector::new(CascadeConfig::default());
    detector.record_event(slow("search", 5.1, 0));
    detector.record_event(slow("search", 5.1, 10));
    detector.record_event(slow("search", 5.1, 20));

    let risk = detector.predict_risk(10.0, 0.0, 0.0, at(60));
    assert!((risk.score - 0.2).abs() < 1e-9);
    assert_eq!(risk.predicted, Some(CascadeKind::LatencyPropagation));
}
