//! SQLite-backed record store.
//!
//! One connection behind an async mutex serves both reads and writes. Records
//! live in `records`; `records_fts` is an external-content FTS5 index kept in
//! sync by trigger.

pub mod migrations;
pub mod pragmas;
pub mod queries;
pub mod write_connection;

use std::path::Path;

use mnemos_core::errors::MnemosResult;
use mnemos_core::{MetadataPatch, Record, RecordStore, SearchHit};

pub use write_connection::WriteConnection;

pub struct SqliteStore {
    writer: WriteConnection,
}

impl SqliteStore {
    /// Open a store backed by a file on disk, running pending migrations.
    pub fn open(path: &Path) -> MnemosResult<Self> {
        let store = Self {
            writer: WriteConnection::open(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> MnemosResult<Self> {
        let store = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> MnemosResult<()> {
        self.writer.with_conn_sync(migrations::run_migrations)
    }

    /// Current schema version.
    pub fn schema_version(&self) -> MnemosResult<u32> {
        self.writer.with_conn_sync(migrations::current_version)
    }
}

impl RecordStore for SqliteStore {
    async fn append(&self, record: Record) -> MnemosResult<String> {
        self.writer
            .with_conn(move |conn| queries::record_crud::insert_record(conn, &record))
            .await
    }

    async fn get(&self, id: &str) -> MnemosResult<Option<Record>> {
        self.writer
            .with_conn(|conn| queries::record_crud::get_record(conn, id))
            .await
    }

    async fn text_search(
        &self,
        query: &str,
        group: &str,
        limit: usize,
    ) -> MnemosResult<Vec<SearchHit>> {
        self.writer
            .with_conn(|conn| queries::record_search::search_fts5(conn, query, group, limit))
            .await
    }

    async fn set_metadata(&self, id: &str, patch: MetadataPatch) -> MnemosResult<()> {
        self.writer
            .with_conn(move |conn| queries::record_crud::apply_patch(conn, id, &patch))
            .await
    }

    async fn scan(&self, group: &str, limit: usize) -> MnemosResult<Vec<Record>> {
        self.writer
            .with_conn(|conn| queries::record_crud::scan_group(conn, group, limit))
            .await
    }
}
