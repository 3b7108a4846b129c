//! # mnemos-core
//!
//! Foundation crate for the Mnemos temporal memory layer.
//! Defines records, lifecycle status, behavioral signals, errors, config,
//! and the record store collaborator trait. Every other crate depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod query;
pub mod record;
pub mod signal;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::MnemosConfig;
pub use errors::{ErrorKind, MnemosError, MnemosResult};
pub use record::{MetadataPatch, Record, RecordMetadata, RecordStatus, Supersession};
pub use signal::{BehavioralScore, BehavioralSignal, SignalCategory, SignalOutcome, SignalPolicy};
pub use traits::{RecordStore, SearchHit};
