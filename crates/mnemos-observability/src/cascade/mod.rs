//! Cascade detection over a sliding window of operation events.

mod classify;
mod detector;
mod event;
mod stats;
mod verdict;

pub use classify::{classify, Classification};
pub use detector::CascadeDetector;
pub use event::{CascadeEvent, OperationKind};
pub use stats::{CascadeStatistics, RiskPrediction};
pub use verdict::{mitigations_for, CascadeKind, CascadeVerdict};

/// Mean event severity above which a verdict is critical.
pub const CRITICAL_SEVERITY: f64 = 5.0;
/// Summed memory growth (MB) above which a verdict is critical.
pub const CRITICAL_MEMORY_IMPACT_MB: f64 = 1_000.0;
/// Trigger severity above which a verdict stays active instead of completing.
pub const ACTIVE_TRIGGER_SEVERITY: f64 = 3.0;
