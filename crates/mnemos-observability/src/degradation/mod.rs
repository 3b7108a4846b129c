//! Collaborator failures absorbed on read paths, kept for reporting.

mod tracker;

pub use tracker::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation};

/// Degradations retained before the oldest are dropped.
pub const MAX_TRACKED_DEGRADATIONS: usize = 512;
