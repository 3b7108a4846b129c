use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use mnemos_core::config::CascadeConfig;

use super::classify::classify;
use super::event::CascadeEvent;
use super::stats::{CascadeStatistics, RiskPrediction};
use super::verdict::{CascadeKind, CascadeVerdict};
use super::ACTIVE_TRIGGER_SEVERITY;
use crate::tracing_setup::events;

/// Sliding-window cascade detector.
///
/// Holds a bounded, time-ordered buffer of recent events. Verdicts whose
/// trigger was severe stay active until they age past twice the window;
/// the rest complete immediately.
#[derive(Debug)]
pub struct CascadeDetector {
    config: CascadeConfig,
    buffer: VecDeque<CascadeEvent>,
    active: Vec<CascadeVerdict>,
    completed: VecDeque<CascadeVerdict>,
}

impl CascadeDetector {
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            buffer: VecDeque::with_capacity(config.max_buffered_events.min(1024)),
            config,
            active: Vec::new(),
            completed: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    fn window(&self) -> Duration {
        Duration::seconds(self.config.window_seconds as i64)
    }

    /// Events currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Record one completed operation and classify the window ending at it.
    ///
    /// The event's own timestamp is "now" for window pruning.
    pub fn record_event(&mut self, event: CascadeEvent) -> Option<CascadeVerdict> {
        let now = event.timestamp;
        let trigger_severity = event.severity();

        self.buffer.push_back(event);
        while self.buffer.len() > self.config.max_buffered_events {
            self.buffer.pop_front();
        }
        let cutoff = now - self.window();
        while self.buffer.front().is_some_and(|e| e.timestamp < cutoff) {
            self.buffer.pop_front();
        }

        let window: Vec<CascadeEvent> = self
            .buffer
            .iter()
            .filter(|e| e.timestamp >= cutoff && e.timestamp <= now)
            .cloned()
            .collect();
        let classification = classify(&window, &self.config)?;
        let verdict = CascadeVerdict::from_classification(classification, &self.config);

        events::cascade_detected(
            &verdict.pattern_id,
            verdict.kind.as_str(),
            verdict.events.len(),
            verdict.severity_score,
            verdict.is_critical,
        );

        if trigger_severity > ACTIVE_TRIGGER_SEVERITY {
            self.active.push(verdict.clone());
        } else {
            self.complete(verdict.clone());
        }
        Some(verdict)
    }

    fn complete(&mut self, verdict: CascadeVerdict) {
        self.completed.push_back(verdict);
        while self.completed.len() > self.config.max_buffered_events {
            self.completed.pop_front();
        }
    }

    /// Active verdicts at `now`, moving any older than twice the window to history.
    pub fn active_cascades(&mut self, now: DateTime<Utc>) -> Vec<CascadeVerdict> {
        let horizon = self.window() * 2;
        let (expired, still_active): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(|v| now - v.start > horizon);
        self.active = still_active;
        for verdict in expired {
            self.complete(verdict);
        }
        self.active.clone()
    }

    /// Completed verdicts that started at or after `since`, optionally of one kind.
    pub fn history(&self, since: DateTime<Utc>, kind: Option<CascadeKind>) -> Vec<CascadeVerdict> {
        self.completed
            .iter()
            .filter(|v| v.start >= since && kind.map_or(true, |k| v.kind == k))
            .cloned()
            .collect()
    }

    pub fn statistics(&mut self, now: DateTime<Utc>) -> CascadeStatistics {
        let active_cascades = self.active_cascades(now).len();
        let history = self.history(now - Duration::hours(24), None);

        let mut stats = CascadeStatistics {
            active_cascades,
            completed_cascades_24h: history.len(),
            ..CascadeStatistics::default()
        };
        for verdict in &history {
            *stats.by_kind.entry(verdict.kind).or_insert(0) += 1;
            stats.total_memory_impact_24h += verdict.total_memory_impact;
        }
        if !history.is_empty() {
            let n = history.len() as f64;
            let total_seconds = history
                .iter()
                .map(|v| v.duration().num_milliseconds() as f64 / 1000.0)
                .sum::<f64>();
            stats.avg_duration_seconds = total_seconds / n;
            stats.avg_severity = history.iter().map(|v| v.severity_score).sum::<f64>() / n;
        }
        stats
    }

    /// Estimate cascade risk from current system metrics.
    pub fn predict_risk(
        &self,
        memory_percent: f64,
        avg_latency: f64,
        error_rate: f64,
        now: DateTime<Utc>,
    ) -> RiskPrediction {
        let mut score = 0.0;
        let mut predicted = None;

        let pressure = self.config.memory_pressure_threshold;
        if memory_percent > pressure {
            score += (memory_percent - pressure) / (100.0 - pressure).max(1.0) * 0.4;
            predicted = Some(CascadeKind::MemoryExhaustion);
        }
        if avg_latency > 3.0 {
            score += (avg_latency / 10.0).min(0.3);
            predicted = predicted.or(Some(CascadeKind::LatencyPropagation));
        }
        if error_rate > 0.1 {
            score += error_rate.min(0.3);
        }
        let recent = self.history(now - Duration::hours(1), None);
        if let Some(last) = recent.last() {
            score += 0.2;
            predicted = predicted.or(Some(last.kind));
        }

        RiskPrediction {
            score: score.min(1.0),
            predicted,
        }
    }
}
