//! Supersession: replacing a record while keeping it for history.
//!
//! Concurrent supersessions of one record are serialized with a per-id async
//! lock, and the status is re-read under the lock before writing, so exactly
//! one successor is ever recorded.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mnemos_core::constants::MAX_SUPERSESSION_DEPTH;
use mnemos_core::{MnemosResult, Record, RecordStore, Supersession};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::store_call::bounded;

/// Per-record async locks, created on demand and dropped when uncontended.
#[derive(Debug, Default)]
pub struct SupersessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SupersessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &str) -> LockLease<'_> {
        let lock = self
            .locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        LockLease {
            locks: self,
            id: id.to_string(),
            guard: Some(guard),
        }
    }

    /// Ids with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held while superseding one record. Dropping it releases the lock and
/// removes the entry once nobody else holds or awaits it.
#[derive(Debug)]
pub struct LockLease<'a> {
    locks: &'a SupersessionLocks,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Build the successor of `old`.
///
/// The successor inherits source, group and title, and is always created
/// strictly after `old` so edges only ever point backward in time.
pub fn successor_of(old: &Record, content: &str, reason: &str, now: DateTime<Utc>) -> Record {
    let created_at = if now > old.created_at {
        now
    } else {
        old.created_at + chrono::Duration::milliseconds(1)
    };
    let mut successor =
        Record::new(content, old.source.clone(), created_at).with_group(old.group.clone());
    successor.title = old.title.clone();
    successor.metadata.supersession = Some(Supersession {
        supersedes: vec![old.id.clone()],
        supersession_reason: reason.to_string(),
        superseded_at: created_at,
        fingerprint: Record::supersession_fingerprint(content, reason),
    });
    successor
}

/// Whether `candidate` is the successor a request with `fingerprint` would create.
pub fn is_same_request(candidate: &Record, old_id: &str, fingerprint: &str) -> bool {
    candidate
        .metadata
        .supersession
        .as_ref()
        .is_some_and(|s| s.fingerprint == fingerprint && s.supersedes.iter().any(|id| id == old_id))
}

/// Records from `id` forward to the current head of its chain.
///
/// Stops at a missing successor, a revisited id or [`MAX_SUPERSESSION_DEPTH`].
pub async fn walk_chain<S: RecordStore>(
    store: &S,
    id: &str,
    timeout: Duration,
) -> MnemosResult<Vec<Record>> {
    let mut chain = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut next = Some(id.to_string());

    while let Some(current) = next.take() {
        if chain.len() >= MAX_SUPERSESSION_DEPTH || !visited.insert(current.clone()) {
            tracing::warn!(record_id = %id, at = %current, "supersession chain walk stopped early");
            break;
        }
        let Some(record) = bounded(timeout, "get", store.get(&current)).await? else {
            if chain.is_empty() {
                return Err(mnemos_core::MnemosError::not_found(current));
            }
            break;
        };
        next = record.metadata.superseded_by.clone();
        chain.push(record);
    }
    Ok(chain)
}
