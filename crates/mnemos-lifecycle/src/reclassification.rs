//! Lazy ACTIVE → HISTORICAL reclassification, evaluated at read time.
//!
//! Evaluation is pure. Committing the result is a separate store write that
//! the caller may suppress.

use std::time::Duration;

use chrono::{DateTime, Utc};
use mnemos_core::config::LifecycleConfig;
use mnemos_core::{MetadataPatch, Record, RecordStatus, RecordStore};
use mnemos_observability::tracing_setup::events;
use serde::{Deserialize, Serialize};

use crate::store_call::bounded;

/// Outcome of evaluating one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReclassificationDecision {
    NoChange,
    ToHistorical { age_days: f64 },
}

/// A record that search reclassified to HISTORICAL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reclassification {
    pub record_id: String,
    pub age_days: f64,
}

/// An ACTIVE record past the age threshold with no successor becomes HISTORICAL.
pub fn evaluate(
    record: &Record,
    age_days: f64,
    config: &LifecycleConfig,
) -> ReclassificationDecision {
    if record.status() == RecordStatus::Active
        && !record.is_superseded()
        && age_days > f64::from(config.historical_age_days)
    {
        ReclassificationDecision::ToHistorical { age_days }
    } else {
        ReclassificationDecision::NoChange
    }
}

/// Persist reclassifications. Returns the ids whose write failed.
///
/// Failures are logged and never abort the remaining writes. A record that
/// was superseded concurrently rejects the patch through the status state
/// machine and shows up here as a failure.
pub async fn commit<S: RecordStore>(
    store: &S,
    reclassified: &[Reclassification],
    now: DateTime<Utc>,
    timeout: Duration,
) -> Vec<String> {
    let mut failures = Vec::new();
    for item in reclassified {
        let patch = MetadataPatch::Status {
            status: RecordStatus::Historical,
            at: now,
            reason: Some(format!("aged {:.1} days without replacement", item.age_days)),
        };
        match bounded(timeout, "set_metadata", store.set_metadata(&item.record_id, patch)).await {
            Ok(()) => events::record_reclassified(&item.record_id, item.age_days),
            Err(e) => {
                tracing::warn!(
                    record_id = %item.record_id,
                    error = %e,
                    "reclassification write failed"
                );
                failures.push(item.record_id.clone());
            }
        }
    }
    failures
}
