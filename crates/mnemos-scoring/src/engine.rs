//! [`ScoringEngine`]: scores signal sets, attaches scores to records and keeps
//! running totals for reporting.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mnemos_core::config::ScoringConfig;
use mnemos_core::constants::SCORING_VERSION;
use mnemos_core::{
    BehavioralScore, BehavioralSignal, MetadataPatch, MnemosError, MnemosResult, RecordStore,
    SignalPolicy,
};
use mnemos_lifecycle::store_call::bounded;
use mnemos_observability::tracing_setup::events;
use serde::{Deserialize, Serialize};

use crate::effectiveness::{compute_breakdown, compute_effectiveness_with};
use crate::temporal::adjust_for_temporal_decay;

/// Success and failure counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub success: usize,
    pub failure: usize,
}

/// Snapshot of everything this engine has scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    pub total_signals: usize,
    pub scores_computed: usize,
    pub scores_attached: usize,
    pub signal_statistics: BTreeMap<String, CategoryCounts>,
    pub weights: BTreeMap<String, f64>,
    pub scoring_version: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Totals {
    signals: usize,
    computed: usize,
    attached: usize,
    by_category: BTreeMap<String, CategoryCounts>,
}

#[derive(Debug)]
pub struct ScoringEngine {
    policy: SignalPolicy,
    config: ScoringConfig,
    decay_factor: f64,
    timeout: Duration,
    totals: Mutex<Totals>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, decay_factor: f64, timeout: Duration) -> Self {
        Self {
            policy: SignalPolicy::from_config(&config),
            config,
            decay_factor,
            timeout,
            totals: Mutex::new(Totals::default()),
        }
    }

    pub fn policy(&self) -> &SignalPolicy {
        &self.policy
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score under the engine's policy.
    pub fn score(
        &self,
        signals: &[BehavioralSignal],
        now: DateTime<Utc>,
    ) -> MnemosResult<BehavioralScore> {
        self.score_with(signals, &self.policy, now)
    }

    /// Score under a caller-supplied policy.
    pub fn score_with(
        &self,
        signals: &[BehavioralSignal],
        policy: &SignalPolicy,
        now: DateTime<Utc>,
    ) -> MnemosResult<BehavioralScore> {
        let value = compute_effectiveness_with(signals, policy)?;
        let score = BehavioralScore {
            value,
            signal_breakdown: compute_breakdown(signals, policy),
            scored_at: now,
            scoring_version: SCORING_VERSION.to_string(),
        };
        self.tally(signals);
        Ok(score)
    }

    /// Score `signals` and write the result onto record `id`.
    ///
    /// Replaces any score the record already carries.
    pub async fn attach<S: RecordStore>(
        &self,
        store: &S,
        id: &str,
        signals: &[BehavioralSignal],
        now: DateTime<Utc>,
    ) -> MnemosResult<BehavioralScore> {
        let score = self.score(signals, now)?;
        if bounded(self.timeout, "get", store.get(id)).await?.is_none() {
            return Err(MnemosError::not_found(id));
        }
        bounded(
            self.timeout,
            "set_metadata",
            store.set_metadata(id, MetadataPatch::Behavioral(score.clone())),
        )
        .await?;
        self.lock().attached += 1;
        events::score_attached(id, score.value);
        Ok(score)
    }

    /// Blend a score with its decay at `age_days`, per the configured blend.
    pub fn temporal_score(&self, base_score: f64, age_days: f64) -> MnemosResult<f64> {
        adjust_for_temporal_decay(
            base_score,
            age_days,
            self.decay_factor,
            self.config.behavioral_blend,
        )
    }

    pub fn scoring_report(&self, now: DateTime<Utc>) -> ScoringReport {
        let totals = self.lock();
        ScoringReport {
            total_signals: totals.signals,
            scores_computed: totals.computed,
            scores_attached: totals.attached,
            signal_statistics: totals.by_category.clone(),
            weights: self
                .policy
                .weights()
                .iter()
                .map(|(category, weight)| (category.name().to_string(), *weight))
                .collect(),
            scoring_version: SCORING_VERSION.to_string(),
            generated_at: now,
        }
    }

    fn tally(&self, signals: &[BehavioralSignal]) {
        let mut totals = self.lock();
        totals.computed += 1;
        totals.signals += signals.len();
        for signal in signals {
            let counts = totals.by_category.entry(signal.category.name().to_string()).or_default();
            if signal.outcome.is_success() {
                counts.success += 1;
            } else {
                counts.failure += 1;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Totals> {
        self.totals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
