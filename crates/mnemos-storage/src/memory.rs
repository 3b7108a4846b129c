//! In-memory record store.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use mnemos_core::errors::{MnemosError, MnemosResult, StoreError};
use mnemos_core::query::query_terms;
use mnemos_core::{MetadataPatch, Record, RecordStore, SearchHit};

use crate::fault::{FaultInjector, StoreOp};

/// `DashMap`-backed store. Relevance is the fraction of query terms found in
/// the record's content or title.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Record>,
    appends: AtomicUsize,
    faults: FaultInjector,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful appends since creation.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Synchronous snapshot of one record, bypassing fault injection.
    pub fn peek(&self, id: &str) -> Option<Record> {
        self.records.get(id).map(|r| r.value().clone())
    }

    fn newest_first(&self, group: &str) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.group == group)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

impl RecordStore for MemoryStore {
    async fn append(&self, record: Record) -> MnemosResult<String> {
        self.faults.before(StoreOp::Append).await?;
        let id = record.id.clone();
        match self.records.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StoreError::DuplicateId { id }.into())
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record);
                self.appends.fetch_add(1, Ordering::SeqCst);
                Ok(id)
            }
        }
    }

    async fn get(&self, id: &str) -> MnemosResult<Option<Record>> {
        self.faults.before(StoreOp::Get).await?;
        Ok(self.peek(id))
    }

    async fn text_search(
        &self,
        query: &str,
        group: &str,
        limit: usize,
    ) -> MnemosResult<Vec<SearchHit>> {
        self.faults.before(StoreOp::TextSearch).await?;
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let mut hits: Vec<SearchHit> = self
            .newest_first(group)
            .into_iter()
            .filter_map(|record| {
                let haystack = format!(
                    "{} {}",
                    record.content.to_lowercase(),
                    record.title.as_deref().unwrap_or_default().to_lowercase()
                );
                let matched = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
                (matched > 0).then(|| SearchHit {
                    record,
                    relevance: Some(matched as f64 / terms.len() as f64),
                })
            })
            .collect();
        // Stable sort keeps newest-first among equal relevance.
        hits.sort_by(|a, b| {
            b.relevance
                .unwrap_or(0.0)
                .total_cmp(&a.relevance.unwrap_or(0.0))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn set_metadata(&self, id: &str, patch: MetadataPatch) -> MnemosResult<()> {
        self.faults.before(StoreOp::SetMetadata).await?;
        let mut entry = self
            .records
            .get_mut(id)
            .ok_or_else(|| MnemosError::not_found(id))?;
        entry.metadata.apply(&patch)
    }

    async fn scan(&self, group: &str, limit: usize) -> MnemosResult<Vec<Record>> {
        self.faults.before(StoreOp::Scan).await?;
        let mut records = self.newest_first(group);
        records.truncate(limit);
        Ok(records)
    }
}
