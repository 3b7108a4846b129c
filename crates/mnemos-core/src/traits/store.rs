use std::future::Future;

use crate::errors::MnemosResult;
use crate::record::{MetadataPatch, Record};

/// A text search candidate. `relevance` is whatever unnormalized ranking the
/// adapter can provide; `None` when it has none.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: Record,
    pub relevance: Option<f64>,
}

impl SearchHit {
    pub fn unranked(record: Record) -> Self {
        Self {
            record,
            relevance: None,
        }
    }
}

/// Append-only record persistence.
///
/// Records are never deleted and their content is never rewritten. The only
/// mutation is [`RecordStore::set_metadata`], which must apply the patch with
/// [`crate::RecordMetadata::apply`] so the status state machine holds for every
/// adapter.
pub trait RecordStore: Send + Sync {
    /// Persist a new record, returning its id.
    fn append(&self, record: Record) -> impl Future<Output = MnemosResult<String>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = MnemosResult<Option<Record>>> + Send;

    /// Unscored candidates for an already sanitized query within one group.
    fn text_search(
        &self,
        query: &str,
        group: &str,
        limit: usize,
    ) -> impl Future<Output = MnemosResult<Vec<SearchHit>>> + Send;

    fn set_metadata(
        &self,
        id: &str,
        patch: MetadataPatch,
    ) -> impl Future<Output = MnemosResult<()>> + Send;

    /// Newest-first enumeration of a group, used by metadata scans.
    fn scan(
        &self,
        group: &str,
        limit: usize,
    ) -> impl Future<Output = MnemosResult<Vec<Record>>> + Send;
}
