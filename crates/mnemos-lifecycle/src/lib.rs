//! # mnemos-lifecycle
//!
//! Turns an append-only set of records into a ranked, time-aware view.
//!
//! - [`decay`]: exponential per-day decay over fractional ages
//! - [`ranking`]: read-with-reclassification scoring and filtering
//! - [`supersession`]: per-id serialized, idempotent replacement
//! - [`cross_refs`]: capture-time cross-domain tagging
//! - [`LifecycleEngine`]: the above wired to a [`mnemos_core::RecordStore`]

pub mod cross_refs;
pub mod decay;
pub mod engine;
pub mod evolution;
pub mod ranking;
pub mod reclassification;
pub mod store_call;
pub mod supersession;

pub use cross_refs::{detect_cross_references, identify_domains, CrossDomainLink, Domain};
pub use engine::LifecycleEngine;
pub use evolution::{EvolutionStep, EvolutionTree};
pub use ranking::{score_and_filter, ScoredBatch, ScoredRecord, SearchOptions};
pub use reclassification::{Reclassification, ReclassificationDecision};
