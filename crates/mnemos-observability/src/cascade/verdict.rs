use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use mnemos_core::config::CascadeConfig;
use serde::{Deserialize, Serialize};

use super::classify::Classification;
use super::event::CascadeEvent;
use super::{CRITICAL_MEMORY_IMPACT_MB, CRITICAL_SEVERITY};

/// The five recognized cascade patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeKind {
    MemoryExhaustion,
    LatencyPropagation,
    SemaphoreStarvation,
    BatchOverflow,
    LlmTimeout,
}

impl CascadeKind {
    pub const ALL: [CascadeKind; 5] = [
        CascadeKind::MemoryExhaustion,
        CascadeKind::LatencyPropagation,
        CascadeKind::SemaphoreStarvation,
        CascadeKind::BatchOverflow,
        CascadeKind::LlmTimeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MemoryExhaustion => "MEMORY_EXHAUSTION",
            Self::LatencyPropagation => "LATENCY_PROPAGATION",
            Self::SemaphoreStarvation => "SEMAPHORE_STARVATION",
            Self::BatchOverflow => "BATCH_OVERFLOW",
            Self::LlmTimeout => "LLM_TIMEOUT",
        }
    }
}

impl std::fmt::Display for CascadeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified cascade with its corroborating events and analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeVerdict {
    pub pattern_id: String,
    pub kind: CascadeKind,
    pub events: Vec<CascadeEvent>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Summed memory growth of the events, in MB.
    pub total_memory_impact: f64,
    /// Longest event duration, in seconds.
    pub max_latency: f64,
    pub affected_operations: BTreeSet<String>,
    /// Mean per-event severity.
    pub severity_score: f64,
    pub is_critical: bool,
    pub mitigations: Vec<String>,
}

impl CascadeVerdict {
    /// Build a verdict from a classification. Latency and event count only
    /// make a verdict critical at `critical_exceedance` times their limits.
    pub(crate) fn from_classification(
        classification: Classification,
        config: &CascadeConfig,
    ) -> Self {
        let Classification {
            kind,
            events,
            exceeds_critically,
        } = classification;

        let start = events.first().map(|e| e.timestamp).unwrap_or_else(Utc::now);
        let end = events.last().map(|e| e.timestamp).unwrap_or(start);
        let total_memory_impact = events.iter().map(|e| e.memory_delta_mb).sum::<f64>();
        let max_latency = events.iter().map(|e| e.duration_seconds).fold(0.0, f64::max);
        let affected_operations: BTreeSet<String> =
            events.iter().map(|e| e.operation.clone()).collect();
        let severity_score = if events.is_empty() {
            0.0
        } else {
            events.iter().map(CascadeEvent::severity).sum::<f64>() / events.len() as f64
        };

        let is_critical = exceeds_critically
            || severity_score > CRITICAL_SEVERITY
            || total_memory_impact > CRITICAL_MEMORY_IMPACT_MB
            || max_latency > config.long_call_threshold_seconds * config.critical_exceedance
            || events.len() as f64 > config.batch_limit as f64 * config.critical_exceedance;

        let mitigations =
            mitigations_for(kind, total_memory_impact, max_latency, affected_operations.len());

        Self {
            pattern_id: format!("cascade_{}", uuid::Uuid::new_v4().simple()),
            kind,
            events,
            start,
            end,
            total_memory_impact,
            max_latency,
            affected_operations,
            severity_score,
            is_critical,
            mitigations,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Suggested mitigations for a cascade kind plus extras driven by its shape.
pub fn mitigations_for(
    kind: CascadeKind,
    total_memory_impact: f64,
    max_latency: f64,
    affected_operations: usize,
) -> Vec<String> {
    let base: &[&str] = match kind {
        CascadeKind::MemoryExhaustion => &[
            "Reduce batch size",
            "Increase memory limits",
            "Trigger garbage collection",
            "Defer non-critical operations",
        ],
        CascadeKind::LatencyPropagation => &[
            "Increase timeout thresholds",
            "Enable request circuit breaker",
            "Reduce concurrent operations",
            "Cache frequent queries",
        ],
        CascadeKind::SemaphoreStarvation => &[
            "Increase semaphore capacity",
            "Implement fairness queuing",
            "Add backpressure mechanism",
        ],
        CascadeKind::BatchOverflow => &[
            "Reduce batch size dynamically",
            "Implement adaptive batching",
            "Add overflow queue",
        ],
        CascadeKind::LlmTimeout => &[
            "Increase LLM timeout",
            "Implement retry with backoff",
            "Use simpler prompts",
            "Switch to faster model",
        ],
    };
    let mut suggestions: Vec<String> = base.iter().map(|s| s.to_string()).collect();

    if total_memory_impact > 500.0 {
        suggestions.push("Consider memory profiling to identify leaks".to_string());
    }
    if max_latency > 20.0 {
        suggestions.push("Review timeout configurations".to_string());
    }
    if affected_operations > 5 {
        suggestions.push("Consider operation isolation or queuing".to_string());
    }
    suggestions
}
