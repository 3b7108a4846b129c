//! Single connection behind `tokio::sync::Mutex`. Serialized access.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use mnemos_core::errors::{MnemosError, MnemosResult, StoreError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> MnemosResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, true)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> MnemosResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, false)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the lock and execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> MnemosResult<T>
    where
        F: FnOnce(&Connection) -> MnemosResult<T> + Send,
        T: Send,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Synchronous access for startup work such as migrations.
    ///
    /// Fails instead of blocking when the connection is in use, so it is safe
    /// to call from inside a runtime.
    pub fn with_conn_sync<F, T>(&self, f: F) -> MnemosResult<T>
    where
        F: FnOnce(&Connection) -> MnemosResult<T>,
    {
        let guard = self.conn.try_lock().map_err(|_| {
            MnemosError::Store(StoreError::Unavailable {
                reason: "sqlite connection busy".to_string(),
            })
        })?;
        f(&guard)
    }
}
