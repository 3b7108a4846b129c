//! Self-monitoring: every service operation reports its own duration to the
//! cascade detector and asks the sampler whether to emit a detailed trace.

use chrono::{DateTime, Duration, Utc};
use mnemos_core::MnemosError;
use mnemos_observability::{CascadeEvent, ObservabilityEngine, SamplingContext};
use tokio::time::Instant;

pub(crate) struct OperationTimer {
    operation: &'static str,
    started: Instant,
    at: DateTime<Utc>,
}

impl OperationTimer {
    pub(crate) fn start(operation: &'static str, now: DateTime<Utc>) -> Self {
        Self {
            operation,
            started: Instant::now(),
            at: now,
        }
    }

    pub(crate) fn finish(self, engine: &ObservabilityEngine, error: Option<&MnemosError>) {
        let elapsed = self.started.elapsed();
        let seconds = elapsed.as_secs_f64();
        let timestamp = self.at + Duration::from_std(elapsed).unwrap_or_else(|_| Duration::zero());

        let mut event = CascadeEvent::new(self.operation, seconds, timestamp);
        let mut ctx = SamplingContext::new(self.operation).with_duration(seconds);
        if let Some(err) = error {
            event = event.with_error(err.to_string());
            ctx = ctx.with_error();
        }
        engine.record_operation_event(event);

        if engine.should_sample_at(&ctx, timestamp) {
            tracing::debug!(
                event = "operation_traced",
                operation = self.operation,
                duration_seconds = seconds,
                error = ?error.map(ToString::to_string),
                "operation trace sampled"
            );
        }
    }
}
