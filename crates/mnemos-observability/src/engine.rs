//! [`ObservabilityEngine`]: cascade detector, sampler, and degradation tracker
//! shared across concurrent callers.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use mnemos_core::config::{CascadeConfig, SamplingConfig};

use crate::cascade::{
    CascadeDetector, CascadeEvent, CascadeStatistics, CascadeVerdict, RiskPrediction,
};
use crate::degradation::{DegradationEvent, DegradationTracker, TrackedDegradation};
use crate::sampling::{AdaptiveSampler, SamplingContext, SamplingStats};

#[derive(Debug)]
struct Signals {
    detector: CascadeDetector,
    sampler: AdaptiveSampler,
}

/// Owns the process-wide observability state.
///
/// Detector and sampler sit behind one lock so that a critical verdict and
/// the escalation it causes are observed together.
#[derive(Debug)]
pub struct ObservabilityEngine {
    signals: Mutex<Signals>,
    degradation: Mutex<DegradationTracker>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ObservabilityEngine {
    pub fn new(cascade: CascadeConfig, sampling: SamplingConfig) -> Self {
        Self::new_at(cascade, sampling, Utc::now())
    }

    /// Create an engine whose sampler clock starts at `now`.
    pub fn new_at(cascade: CascadeConfig, sampling: SamplingConfig, now: DateTime<Utc>) -> Self {
        Self {
            signals: Mutex::new(Signals {
                detector: CascadeDetector::new(cascade),
                sampler: AdaptiveSampler::new(sampling, now),
            }),
            degradation: Mutex::new(DegradationTracker::new()),
        }
    }

    /// Feed one completed operation to the detector.
    ///
    /// A critical verdict moves the sampler straight to full sampling.
    pub fn record_operation_event(&self, event: CascadeEvent) -> Option<CascadeVerdict> {
        let at = event.timestamp;
        let mut signals = lock(&self.signals);
        let verdict = signals.detector.record_event(event)?;
        if verdict.is_critical {
            signals.sampler.escalate_to_max(at);
        }
        Some(verdict)
    }

    pub fn should_sample(&self, ctx: &SamplingContext) -> bool {
        self.should_sample_at(ctx, Utc::now())
    }

    pub fn should_sample_at(&self, ctx: &SamplingContext, now: DateTime<Utc>) -> bool {
        lock(&self.signals).sampler.should_sample_at(ctx, now)
    }

    pub fn active_cascades(&self, now: DateTime<Utc>) -> Vec<CascadeVerdict> {
        lock(&self.signals).detector.active_cascades(now)
    }

    pub fn cascade_statistics(&self, now: DateTime<Utc>) -> CascadeStatistics {
        lock(&self.signals).detector.statistics(now)
    }

    pub fn predict_risk(
        &self,
        memory_percent: f64,
        avg_latency: f64,
        error_rate: f64,
        now: DateTime<Utc>,
    ) -> RiskPrediction {
        lock(&self.signals)
            .detector
            .predict_risk(memory_percent, avg_latency, error_rate, now)
    }

    pub fn sampling_level(&self) -> u8 {
        lock(&self.signals).sampler.level()
    }

    pub fn sampling_stats(&self, now: DateTime<Utc>) -> SamplingStats {
        lock(&self.signals).sampler.stats(now)
    }

    pub fn record_degradation(&self, event: DegradationEvent) {
        lock(&self.degradation).record(event);
    }

    pub fn mark_recovered(&self, component: &str, at: DateTime<Utc>) -> usize {
        lock(&self.degradation).mark_recovered(component, at)
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        lock(&self.degradation).is_degraded(component)
    }

    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        lock(&self.degradation).events()
    }
}

impl Default for ObservabilityEngine {
    fn default() -> Self {
        Self::new(CascadeConfig::default(), SamplingConfig::default())
    }
}
