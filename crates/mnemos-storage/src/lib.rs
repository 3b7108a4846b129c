//! # mnemos-storage
//!
//! Reference [`RecordStore`](mnemos_core::RecordStore) adapters.
//! [`MemoryStore`] keeps everything in a `DashMap` and supports fault injection
//! for degradation tests. [`SqliteStore`] persists to SQLite with an FTS5 index.

pub mod fault;
pub mod memory;
pub mod sqlite;

pub use fault::{FaultInjector, StoreOp};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use mnemos_core::errors::{MnemosError, StoreError};

/// Convert a backend error message into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> MnemosError {
    MnemosError::Store(StoreError::Backend {
        message: message.into(),
    })
}
