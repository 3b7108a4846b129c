use serde::{Deserialize, Serialize};

use super::defaults;

/// Adaptive sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sampling probability at escalation level 0.
    pub base_rate: f64,
    /// Memory usage percent above which a call counts as adverse.
    pub memory_pressure_threshold: u8,
    /// Single-operation latency above which a call counts as adverse.
    pub latency_threshold_seconds: f64,
    /// Highest escalation level; it samples with probability 1.0.
    pub max_level: u8,
    /// Quiet period required before stepping down one level.
    pub cooldown_seconds: u64,
    /// Payloads at or above this size are always sampled.
    pub large_payload_bytes: usize,
    /// Rolling window for sampling metrics.
    pub metrics_window_seconds: u64,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            base_rate: defaults::DEFAULT_BASE_SAMPLE_RATE,
            memory_pressure_threshold: defaults::DEFAULT_MEMORY_PRESSURE_THRESHOLD,
            latency_threshold_seconds: defaults::DEFAULT_LATENCY_THRESHOLD_SECONDS,
            max_level: defaults::DEFAULT_MAX_ESCALATION_LEVEL,
            cooldown_seconds: defaults::DEFAULT_COOLDOWN_SECONDS,
            large_payload_bytes: defaults::DEFAULT_LARGE_PAYLOAD_BYTES,
            metrics_window_seconds: defaults::DEFAULT_METRICS_WINDOW_SECONDS,
            seed: None,
        }
    }
}
