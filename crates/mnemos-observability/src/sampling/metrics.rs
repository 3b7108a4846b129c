use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Why the sampler escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationCause {
    MemoryPressure,
    Latency,
    Error,
    CriticalCascade,
}

impl EscalationCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MemoryPressure => "memory_pressure",
            Self::Latency => "latency",
            Self::Error => "error",
            Self::CriticalCascade => "critical_cascade",
        }
    }
}

/// Sampling decisions and escalation causes over a rolling window.
#[derive(Debug, Clone)]
pub struct SamplingMetrics {
    window: Duration,
    decisions: VecDeque<(DateTime<Utc>, bool)>,
    escalations: VecDeque<(DateTime<Utc>, EscalationCause)>,
}

impl SamplingMetrics {
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window: Duration::seconds(window_seconds as i64),
            decisions: VecDeque::new(),
            escalations: VecDeque::new(),
        }
    }

    pub fn record_decision(&mut self, at: DateTime<Utc>, sampled: bool) {
        self.decisions.push_back((at, sampled));
        self.prune(at);
    }

    pub fn record_cause(&mut self, at: DateTime<Utc>, cause: EscalationCause) {
        self.escalations.push_back((at, cause));
        self.prune(at);
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        while self.decisions.front().is_some_and(|(t, _)| *t < cutoff) {
            self.decisions.pop_front();
        }
        while self.escalations.front().is_some_and(|(t, _)| *t < cutoff) {
            self.escalations.pop_front();
        }
    }

    fn in_window<T>(&self, entries: &VecDeque<(DateTime<Utc>, T)>, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        entries.iter().filter(|(t, _)| *t >= cutoff).count()
    }

    pub fn total_decisions(&self, now: DateTime<Utc>) -> usize {
        self.in_window(&self.decisions, now)
    }

    pub fn sampled(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        self.decisions
            .iter()
            .filter(|(t, sampled)| *t >= cutoff && *sampled)
            .count()
    }

    /// Observed sampled fraction in the window, 0.0 with no decisions.
    pub fn current_rate(&self, now: DateTime<Utc>) -> f64 {
        let total = self.total_decisions(now);
        if total == 0 {
            return 0.0;
        }
        self.sampled(now) as f64 / total as f64
    }

    pub fn cause_counts(&self, now: DateTime<Utc>) -> BTreeMap<EscalationCause, usize> {
        let cutoff = now - self.window;
        let mut counts = BTreeMap::new();
        for (_, cause) in self.escalations.iter().filter(|(t, _)| *t >= cutoff) {
            *counts.entry(*cause).or_insert(0) += 1;
        }
        counts
    }

    pub fn escalations(&self, now: DateTime<Utc>) -> usize {
        self.in_window(&self.escalations, now)
    }
}
