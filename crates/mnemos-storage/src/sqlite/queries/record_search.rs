//! FTS5 full-text search.

use rusqlite::{params, Connection};

use mnemos_core::errors::MnemosResult;
use mnemos_core::query::query_terms;
use mnemos_core::SearchHit;

use super::record_crud::{parse_record_row, RECORD_COLUMNS};
use crate::to_storage_err;

/// Build an FTS5 MATCH expression: every term quoted, any term may match.
pub fn match_expression(sanitized: &str) -> Option<String> {
    let terms = query_terms(sanitized);
    if terms.is_empty() {
        return None;
    }
    Some(
        terms
            .iter()
            .map(|t| format!("\"{}\"", t.replace('"', "")))
            .collect::<Vec<_>>()
            .join(" OR "),
    )
}

/// Search one group. Relevance is the negated BM25 rank, so higher is better.
pub fn search_fts5(
    conn: &Connection,
    query: &str,
    group: &str,
    limit: usize,
) -> MnemosResult<Vec<SearchHit>> {
    let Some(expr) = match_expression(query) else {
        return Ok(Vec::new());
    };
    let sql = format!(
        "SELECT {RECORD_COLUMNS}, bm25(records_fts) AS score
         FROM records_fts
         JOIN records r ON r.rowid = records_fts.rowid
         WHERE records_fts MATCH ?1 AND r.group_id = ?2
         ORDER BY score, r.created_at DESC
         LIMIT ?3"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![expr, group, limit as i64], |row| {
            let record = parse_record_row(row)?;
            let score: f64 = row.get(8)?;
            Ok(record.map(|record| SearchHit {
                record,
                relevance: Some(-score),
            }))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut hits = Vec::new();
    for row in rows {
        hits.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(hits)
}
