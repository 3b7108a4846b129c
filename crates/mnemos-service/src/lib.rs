//! # mnemos-service
//!
//! The operation surface callers use: search, capture, supersede, deprecate,
//! cross-domain links, memory evolution, operation events and sampling.
//!
//! Read paths degrade to empty results when the record store fails. Write
//! paths propagate every failure.

pub mod outcome;
pub mod request;
pub mod runtime;
pub mod service;

mod monitor;

pub use outcome::{FailureKind, OperationOutcome};
pub use request::{CaptureRequest, ReadResponse, SearchRequest};
pub use runtime::{init_tracing, open_sqlite, ServiceOptions};
pub use service::MemoryService;
