//! # mnemos-observability
//!
//! Watches operation timings and resource pressure, classifies cascade
//! patterns, and decides how much diagnostic tracing to capture.
//!
//! - [`cascade::CascadeDetector`]: sliding-window pattern classification
//! - [`sampling::AdaptiveSampler`]: hysteretic escalation ladder
//! - [`ObservabilityEngine`]: both behind one lock, plus degradation tracking

pub mod cascade;
pub mod degradation;
pub mod engine;
pub mod sampling;
pub mod tracing_setup;

pub use cascade::{CascadeDetector, CascadeEvent, CascadeKind, CascadeVerdict, OperationKind};
pub use degradation::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use engine::ObservabilityEngine;
pub use sampling::{AdaptiveSampler, EscalationCause, SamplingContext, SamplingStats};
