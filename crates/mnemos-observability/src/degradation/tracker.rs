use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::MAX_TRACKED_DEGRADATIONS;
use crate::tracing_setup::events;

/// One absorbed collaborator failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    /// Collaborator that failed, e.g. `"record_store"`.
    pub component: String,
    /// Operation that observed the failure, e.g. `"search"`.
    pub operation: String,
    pub failure: String,
    /// What the caller got instead, e.g. `"empty_results"`.
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(
        component: impl Into<String>,
        operation: impl Into<String>,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still degraded.
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Bounded log of degradation events with recovery status.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation, dropping the oldest past capacity.
    pub fn record(&mut self, event: DegradationEvent) {
        events::collaborator_degraded(&event.component, &event.failure, &event.fallback_used);
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        while self.events.len() > MAX_TRACKED_DEGRADATIONS {
            self.events.pop_front();
        }
    }

    /// Mark every active degradation of `component` as recovered.
    ///
    /// Returns how many entries changed.
    pub fn mark_recovered(&mut self, component: &str, at: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(at);
                changed += 1;
            }
        }
        changed
    }

    pub fn events(&self) -> Vec<TrackedDegradation> {
        self.events.iter().cloned().collect()
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    /// Events for `component` in the `window` ending at `now`.
    pub fn count_recent(&self, component: &str, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `component` has been continuously degraded, if it is.
    pub fn degraded_duration(&self, component: &str, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| {
                t.event.component == component && t.recovery_status == RecoveryStatus::Active
            })
            .map(|t| t.event.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
