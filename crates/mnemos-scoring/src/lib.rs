//! # mnemos-scoring
//!
//! Derives an effectiveness score for a record from observed outcomes,
//! blends it with temporal decay, and attaches it to the record's metadata.

pub mod correlation;
pub mod effectiveness;
pub mod engine;
pub mod temporal;

pub use correlation::{correlate, CorrelationReport};
pub use effectiveness::{compute_breakdown, compute_effectiveness, compute_effectiveness_with};
pub use engine::{CategoryCounts, ScoringEngine, ScoringReport};
pub use mnemos_core::SignalPolicy;
pub use temporal::adjust_for_temporal_decay;
