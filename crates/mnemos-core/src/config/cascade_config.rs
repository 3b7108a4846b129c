use serde::{Deserialize, Serialize};

use super::defaults;

/// Cascade detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Sliding window length in seconds.
    pub window_seconds: u64,
    /// Minimum in-window events before any pattern may match.
    pub min_events: usize,
    /// Per-operation latency threshold in seconds.
    pub latency_threshold_seconds: f64,
    /// Remote-call timeout threshold in seconds.
    pub long_call_threshold_seconds: f64,
    /// Queue wait threshold for semaphore starvation, in seconds.
    pub wait_threshold_seconds: f64,
    /// Absolute memory delta (MB) still considered flat.
    pub flat_memory_tolerance_mb: f64,
    /// In-window event count above which the window is a batch overflow.
    pub batch_limit: usize,
    /// Multiple of a threshold at which a verdict becomes critical.
    pub critical_exceedance: f64,
    /// Memory pressure at which memory exhaustion becomes critical.
    pub memory_critical_percent: f64,
    /// Memory pressure above which exhaustion patterns are considered.
    pub memory_pressure_threshold: f64,
    /// Upper bound on buffered events regardless of window.
    pub max_buffered_events: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            window_seconds: defaults::DEFAULT_CASCADE_WINDOW_SECONDS,
            min_events: defaults::DEFAULT_CASCADE_MIN_EVENTS,
            latency_threshold_seconds: defaults::DEFAULT_LATENCY_THRESHOLD_SECONDS,
            long_call_threshold_seconds: defaults::DEFAULT_LONG_CALL_THRESHOLD_SECONDS,
            wait_threshold_seconds: defaults::DEFAULT_WAIT_THRESHOLD_SECONDS,
            flat_memory_tolerance_mb: defaults::DEFAULT_FLAT_MEMORY_TOLERANCE_MB,
            batch_limit: defaults::DEFAULT_BATCH_LIMIT,
            critical_exceedance: defaults::DEFAULT_CRITICAL_EXCEEDANCE,
            memory_critical_percent: defaults::DEFAULT_MEMORY_CRITICAL_PERCENT,
            memory_pressure_threshold: defaults::DEFAULT_MEMORY_PRESSURE_THRESHOLD as f64,
            max_buffered_events: defaults::DEFAULT_MAX_BUFFERED_EVENTS,
        }
    }
}
