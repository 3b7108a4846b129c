//! Structured log events for key lifecycle and observability operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

pub fn record_captured(record_id: &str, source: &str, behavioral_score: Option<f64>) {
    tracing::info!(
        event = "record_captured",
        record_id = %record_id,
        source = %source,
        behavioral_score = ?behavioral_score,
        "record captured"
    );
}

pub fn record_reclassified(record_id: &str, age_days: f64) {
    tracing::info!(
        event = "record_reclassified",
        record_id = %record_id,
        age_days = age_days,
        "record reclassified to historical"
    );
}

pub fn record_superseded(old_id: &str, new_id: &str, reason: &str) {
    tracing::info!(
        event = "record_superseded",
        old_id = %old_id,
        new_id = %new_id,
        reason = %reason,
        "record superseded"
    );
}

pub fn record_deprecated(record_id: &str, reason: &str) {
    tracing::info!(
        event = "record_deprecated",
        record_id = %record_id,
        reason = %reason,
        "record deprecated"
    );
}

pub fn score_attached(record_id: &str, score: f64) {
    tracing::debug!(
        event = "score_attached",
        record_id = %record_id,
        score = score,
        "behavioral score attached"
    );
}

/// Log a detected cascade. Critical cascades log at warn level.
pub fn cascade_detected(
    pattern_id: &str,
    kind: &str,
    events: usize,
    severity: f64,
    critical: bool,
) {
    if critical {
        tracing::warn!(
            event = "cascade_detected",
            pattern_id = %pattern_id,
            kind = %kind,
            events = events,
            severity = severity,
            critical = true,
            "critical cascade detected"
        );
    } else {
        tracing::info!(
            event = "cascade_detected",
            pattern_id = %pattern_id,
            kind = %kind,
            events = events,
            severity = severity,
            critical = false,
            "cascade detected"
        );
    }
}

pub fn sampling_escalated(from_level: u8, to_level: u8, cause: &str) {
    tracing::info!(
        event = "sampling_escalated",
        from_level = from_level,
        to_level = to_level,
        cause = %cause,
        "sampling escalated"
    );
}

pub fn sampling_deescalated(from_level: u8, to_level: u8) {
    tracing::info!(
        event = "sampling_deescalated",
        from_level = from_level,
        to_level = to_level,
        "sampling de-escalated"
    );
}

/// Log a scan that returned its full limit, so older records were not examined.
pub fn scan_truncated(operation: &str, limit: usize) {
    tracing::warn!(
        event = "scan_truncated",
        operation = %operation,
        limit = limit,
        "scan limit reached; older records were skipped"
    );
}

/// Log a collaborator failure that was absorbed on a read path.
pub fn collaborator_degraded(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "collaborator_degraded",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "collaborator degraded"
    );
}
