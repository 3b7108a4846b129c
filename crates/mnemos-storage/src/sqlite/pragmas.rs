//! PRAGMA configuration applied to every connection.

use rusqlite::Connection;

use mnemos_core::errors::MnemosResult;

use crate::to_storage_err;

/// WAL for file-backed databases, NORMAL sync, 5s busy timeout.
pub fn apply_pragmas(conn: &Connection, file_backed: bool) -> MnemosResult<()> {
    if file_backed {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
