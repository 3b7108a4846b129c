//! Insert, get, scan and metadata patch queries.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use mnemos_core::errors::{MnemosError, MnemosResult, StoreError};
use mnemos_core::{MetadataPatch, Record, RecordMetadata};

use crate::to_storage_err;

pub(crate) const RECORD_COLUMNS: &str =
    "r.id, r.content, r.title, r.source, r.group_id, r.created_at, r.content_hash, r.metadata";

/// Timestamps are stored as fixed-width RFC 3339 so text order is time order.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> MnemosResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {raw:?}: {e}")))
}

/// Parse a row selected with [`RECORD_COLUMNS`] starting at column 0.
///
/// The outer result is the SQLite column read; the inner one covers decoding
/// the stored timestamp and metadata JSON.
pub(crate) fn parse_record_row(row: &Row<'_>) -> rusqlite::Result<MnemosResult<Record>> {
    let created_at: String = row.get(5)?;
    let metadata: String = row.get(7)?;
    let created_at = match parse_ts(&created_at) {
        Ok(ts) => ts,
        Err(e) => return Ok(Err(e)),
    };
    let metadata = match serde_json::from_str::<RecordMetadata>(&metadata) {
        Ok(m) => m,
        Err(e) => return Ok(Err(e.into())),
    };
    Ok(Ok(Record {
        id: row.get(0)?,
        content: row.get(1)?,
        title: row.get(2)?,
        source: row.get(3)?,
        group: row.get(4)?,
        created_at,
        content_hash: row.get(6)?,
        metadata,
    }))
}

pub fn insert_record(conn: &Connection, record: &Record) -> MnemosResult<String> {
    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM records WHERE id = ?1", [&record.id], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if exists.is_some() {
        return Err(StoreError::DuplicateId {
            id: record.id.clone(),
        }
        .into());
    }

    let metadata = serde_json::to_string(&record.metadata)?;
    conn.execute(
        "INSERT INTO records (id, content, title, source, group_id, created_at, content_hash, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.content,
            record.title,
            record.source,
            record.group,
            format_ts(&record.created_at),
            record.content_hash,
            metadata,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(record.id.clone())
}

pub fn get_record(conn: &Connection, id: &str) -> MnemosResult<Option<Record>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records r WHERE r.id = ?1");
    let row = conn
        .query_row(&sql, [id], parse_record_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.transpose()
}

pub fn scan_group(conn: &Connection, group: &str, limit: usize) -> MnemosResult<Vec<Record>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records r
         WHERE r.group_id = ?1
         ORDER BY r.created_at DESC, r.rowid DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![group, limit as i64], parse_record_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

/// Read, patch and write back one record's metadata inside a transaction.
pub fn apply_patch(conn: &Connection, id: &str, patch: &MetadataPatch) -> MnemosResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let raw: Option<String> = tx
        .query_row("SELECT metadata FROM records WHERE id = ?1", [id], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let raw = raw.ok_or_else(|| MnemosError::not_found(id))?;

    let mut metadata: RecordMetadata = serde_json::from_str(&raw)?;
    metadata.apply(patch)?;

    tx.execute(
        "UPDATE records SET metadata = ?2 WHERE id = ?1",
        params![id, serde_json::to_string(&metadata)?],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
