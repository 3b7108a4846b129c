use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use mnemos_core::config::SamplingConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::ladder::EscalationLadder;
use super::metrics::{EscalationCause, SamplingMetrics};
use crate::tracing_setup::events;

/// What a caller knows about the operation it may trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingContext {
    pub operation: String,
    pub payload_size: usize,
    /// Current memory usage, 0–100, if known.
    pub memory_percent: Option<f64>,
    /// Duration of the operation in seconds, if it already completed.
    pub duration_seconds: Option<f64>,
    pub error: bool,
    /// Whether the cascade detector currently reports a critical pattern.
    pub critical_cascade: bool,
}

impl SamplingContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Self::default()
        }
    }

    pub fn with_payload_size(mut self, bytes: usize) -> Self {
        self.payload_size = bytes;
        self
    }

    pub fn with_memory_percent(mut self, percent: f64) -> Self {
        self.memory_percent = Some(percent);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_error(mut self) -> Self {
        self.error = true;
        self
    }

    pub fn with_critical_cascade(mut self) -> Self {
        self.critical_cascade = true;
        self
    }
}

/// Point-in-time view of sampler state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingStats {
    pub level: u8,
    pub max_level: u8,
    pub probability: f64,
    pub base_rate: f64,
    pub last_change: DateTime<Utc>,
    pub quiet_since: DateTime<Utc>,
    pub decisions_in_window: usize,
    pub sampled_in_window: usize,
    pub observed_rate: f64,
    pub causes: BTreeMap<EscalationCause, usize>,
}

/// Process-wide escalation state, owned and injected rather than global.
///
/// Adverse signals move the level up one step per call; a critical cascade
/// verdict jumps straight to the top. The level steps down one at a time,
/// only after a full cooldown without adverse signals, and each step restarts
/// the cooldown.
#[derive(Debug)]
pub struct AdaptiveSampler {
    config: SamplingConfig,
    ladder: EscalationLadder,
    level: u8,
    last_change: DateTime<Utc>,
    quiet_since: DateTime<Utc>,
    metrics: SamplingMetrics,
    rng: StdRng,
}

impl AdaptiveSampler {
    pub fn new(config: SamplingConfig, now: DateTime<Utc>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            ladder: EscalationLadder::new(config.base_rate, config.max_level),
            metrics: SamplingMetrics::new(config.metrics_window_seconds),
            config,
            level: 0,
            last_change: now,
            quiet_since: now,
            rng,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_level(&self) -> u8 {
        self.ladder.max_level()
    }

    /// Probability applied to the next draw at the current level.
    pub fn current_probability(&self) -> f64 {
        self.ladder.probability(self.level)
    }

    fn cooldown(&self) -> Duration {
        Duration::seconds(self.config.cooldown_seconds as i64)
    }

    fn adverse_causes(&self, ctx: &SamplingContext) -> Vec<EscalationCause> {
        let mut causes = Vec::new();
        if ctx
            .memory_percent
            .is_some_and(|p| p > f64::from(self.config.memory_pressure_threshold))
        {
            causes.push(EscalationCause::MemoryPressure);
        }
        if ctx
            .duration_seconds
            .is_some_and(|d| d > self.config.latency_threshold_seconds)
        {
            causes.push(EscalationCause::Latency);
        }
        if ctx.error {
            causes.push(EscalationCause::Error);
        }
        if ctx.critical_cascade {
            causes.push(EscalationCause::CriticalCascade);
        }
        causes
    }

    fn set_level(&mut self, level: u8, now: DateTime<Utc>) {
        self.level = level.min(self.ladder.max_level());
        self.last_change = now;
    }

    /// Raise the level by one, capped at the top.
    pub fn escalate(&mut self, cause: EscalationCause, now: DateTime<Utc>) {
        self.metrics.record_cause(now, cause);
        self.quiet_since = now;
        if self.level < self.ladder.max_level() {
            let from = self.level;
            self.set_level(from + 1, now);
            events::sampling_escalated(from, self.level, cause.as_str());
        }
    }

    /// Jump to full sampling after a critical cascade verdict.
    pub fn escalate_to_max(&mut self, now: DateTime<Utc>) {
        self.metrics.record_cause(now, EscalationCause::CriticalCascade);
        self.quiet_since = now;
        let from = self.level;
        if from < self.ladder.max_level() {
            self.set_level(self.ladder.max_level(), now);
            events::sampling_escalated(from, self.level, EscalationCause::CriticalCascade.as_str());
        }
    }

    /// Step down one level if a full cooldown has passed without adverse signals.
    fn maybe_deescalate(&mut self, now: DateTime<Utc>) {
        if self.level == 0 || now - self.quiet_since < self.cooldown() {
            return;
        }
        let from = self.level;
        self.set_level(from - 1, now);
        self.quiet_since = now;
        events::sampling_deescalated(from, self.level);
    }

    /// Decide whether to capture a detailed trace, using wall-clock time.
    pub fn should_sample(&mut self, ctx: &SamplingContext) -> bool {
        self.should_sample_at(ctx, Utc::now())
    }

    /// Decide whether to capture a detailed trace at `now`.
    ///
    /// Adverse operations escalate and are always sampled. Large payloads are
    /// always sampled without affecting the level.
    pub fn should_sample_at(&mut self, ctx: &SamplingContext, now: DateTime<Utc>) -> bool {
        let causes = self.adverse_causes(ctx);
        let adverse = !causes.is_empty();
        if let Some(first) = causes.first().copied() {
            for cause in causes.iter().skip(1) {
                self.metrics.record_cause(now, *cause);
            }
            self.escalate(first, now);
        } else {
            self.maybe_deescalate(now);
        }

        let sampled = adverse
            || ctx.payload_size > self.config.large_payload_bytes
            || self.rng.random::<f64>() < self.current_probability();
        self.metrics.record_decision(now, sampled);
        sampled
    }

    pub fn stats(&self, now: DateTime<Utc>) -> SamplingStats {
        SamplingStats {
            level: self.level,
            max_level: self.ladder.max_level(),
            probability: self.current_probability(),
            base_rate: self.config.base_rate,
            last_change: self.last_change,
            quiet_since: self.quiet_since,
            decisions_in_window: self.metrics.total_decisions(now),
            sampled_in_window: self.metrics.sampled(now),
            observed_rate: self.metrics.current_rate(now),
            causes: self.metrics.cause_counts(now),
        }
    }

    pub fn metrics(&self) -> &SamplingMetrics {
        &self.metrics
    }
}
