//! Schema migrations tracked with `PRAGMA user_version`.

pub mod v001_records;

use rusqlite::Connection;

use mnemos_core::errors::{MnemosError, MnemosResult, StoreError};

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> MnemosResult<()> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[(v001_records::MIGRATION_SQL, 1)];

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql).map_err(|e| StoreError::MigrationFailed {
                version: *version,
                message: e.to_string(),
            })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StoreError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }
    Ok(())
}

pub fn current_version(conn: &Connection) -> MnemosResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| {
            MnemosError::from(StoreError::MigrationFailed {
                version: 0,
                message: e.to_string(),
            })
        })
}
