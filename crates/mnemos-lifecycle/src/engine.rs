//! [`LifecycleEngine`]: decay, reclassification and supersession over a record store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mnemos_core::config::LifecycleConfig;
use mnemos_core::constants::MAX_CONTENT_BYTES;
use mnemos_core::query::sanitize_query;
use mnemos_core::{MetadataPatch, MnemosError, MnemosResult, Record, RecordStatus, RecordStore};
use mnemos_observability::tracing_setup::events;
use mnemos_observability::{search_span, supersede_span};
use tracing::Instrument;

use crate::cross_refs::{detect_cross_references, identify_domains, matching_tags, CrossDomainLink};
use crate::evolution::EvolutionTree;
use crate::ranking::{rank_order, score_and_filter, score_record, ScoredBatch, SearchOptions};
use crate::reclassification;
use crate::store_call::bounded;
use crate::supersession::{self, SupersessionLocks};

/// Memory lifecycle over a shared record store.
///
/// Every store call is bounded by `timeout`. Time is always passed in by the
/// caller.
#[derive(Debug)]
pub struct LifecycleEngine<S> {
    store: Arc<S>,
    config: LifecycleConfig,
    timeout: Duration,
    locks: SupersessionLocks,
    /// Successors appended whose old-record write has not landed yet,
    /// keyed by `"{old_id}:{fingerprint}"`.
    pending: DashMap<String, String>,
}

impl<S: RecordStore> LifecycleEngine<S> {
    pub fn new(store: Arc<S>, config: LifecycleConfig, timeout: Duration) -> Self {
        Self {
            store,
            config,
            timeout,
            locks: SupersessionLocks::new(),
            pending: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ranked search with lazy reclassification.
    ///
    /// Store failures propagate; reclassification write failures do not and
    /// are reported in [`ScoredBatch::write_failures`].
    pub async fn search(
        &self,
        query: &str,
        group: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> MnemosResult<ScoredBatch> {
        let span = search_span!(query, options.include_historical);
        self.search_ranked(query, group, options, now).instrument(span).await
    }

    async fn search_ranked(
        &self,
        query: &str,
        group: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> MnemosResult<ScoredBatch> {
        let sanitized = sanitize_query(query);
        if sanitized.is_empty() {
            return Ok(ScoredBatch::default());
        }
        let hits = bounded(
            self.timeout,
            "text_search",
            self.store.text_search(&sanitized, group, options.candidate_limit),
        )
        .await?;
        let candidates = hits.len();

        let mut batch = score_and_filter(hits, now, options, &self.config);
        if !options.dry_run && !batch.reclassified.is_empty() {
            batch.write_failures = reclassification::commit(
                self.store.as_ref(),
                &batch.reclassified,
                now,
                self.timeout,
            )
            .await;
        }
        tracing::debug!(
            candidates,
            results = batch.results.len(),
            reclassified = batch.reclassified.len(),
            dry_run = options.dry_run,
            "search ranked"
        );
        Ok(batch)
    }

    /// Validate content and tag it with cross-references before append.
    pub fn prepare_capture(&self, record: &mut Record) -> MnemosResult<()> {
        if record.content.trim().is_empty() {
            return Err(MnemosError::validation("content", "must not be empty"));
        }
        if record.content.len() > MAX_CONTENT_BYTES {
            return Err(MnemosError::validation(
                "content",
                format!(
                    "{} bytes exceeds the {MAX_CONTENT_BYTES} byte limit",
                    record.content.len()
                ),
            ));
        }
        if self.config.enable_cross_references {
            let mut text = record.content.clone();
            if let Some(title) = &record.title {
                text.push(' ');
                text.push_str(title);
            }
            for tag in detect_cross_references(&text) {
                if !record.metadata.cross_references.contains(&tag) {
                    record.metadata.cross_references.push(tag);
                }
            }
        }
        Ok(())
    }

    /// Append a prepared record as a single write.
    pub async fn capture(&self, mut record: Record) -> MnemosResult<String> {
        self.prepare_capture(&mut record)?;
        let source = record.source.clone();
        let score = record.metadata.behavioral.as_ref().map(|b| b.value);
        let id = bounded(self.timeout, "append", self.store.append(record)).await?;
        events::record_captured(&id, &source, score);
        Ok(id)
    }

    /// Replace `old_id` with a new record, returning the successor id.
    ///
    /// Retrying with the same content and reason returns the same successor.
    pub async fn supersede(
        &self,
        old_id: &str,
        new_content: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<String> {
        if new_content.trim().is_empty() {
            return Err(MnemosError::validation("new_content", "must not be empty"));
        }
        let span = supersede_span!(old_id);
        async {
            let _lease = self.locks.acquire(old_id).await;
            self.supersede_locked(old_id, new_content, reason, now).await
        }
        .instrument(span)
        .await
    }

    async fn supersede_locked(
        &self,
        old_id: &str,
        new_content: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<String> {
        let old = self.fetch(old_id).await?;
        if old.status() == RecordStatus::Deprecated {
            return Err(MnemosError::validation(
                "old_id",
                format!("{old_id} is deprecated and cannot be superseded"),
            ));
        }

        let fingerprint = Record::supersession_fingerprint(new_content, reason);
        if let Some(existing) = old.metadata.superseded_by.as_deref() {
            let successor = bounded(self.timeout, "get", self.store.get(existing)).await?;
            return match successor {
                Some(s) if supersession::is_same_request(&s, old_id, &fingerprint) => {
                    tracing::debug!(
                        old_id,
                        new_id = %s.id,
                        "supersession retried, returning existing successor"
                    );
                    Ok(s.id)
                }
                _ => Err(MnemosError::validation(
                    "old_id",
                    format!("{old_id} is already superseded by {existing}"),
                )),
            };
        }

        let pending_key = format!("{old_id}:{fingerprint}");
        let pending = self.pending.get(&pending_key).map(|entry| entry.value().clone());
        let new_id = match pending {
            Some(id) => id,
            None => {
                let mut successor = supersession::successor_of(&old, new_content, reason, now);
                self.prepare_capture(&mut successor)?;
                let id = bounded(self.timeout, "append", self.store.append(successor)).await?;
                self.pending.insert(pending_key.clone(), id.clone());
                id
            }
        };

        let patch = MetadataPatch::SupersededBy {
            successor_id: new_id.clone(),
            reason: reason.to_string(),
            at: now,
        };
        bounded(self.timeout, "set_metadata", self.store.set_metadata(old_id, patch)).await?;
        self.pending.remove(&pending_key);

        events::record_superseded(old_id, &new_id, reason);
        Ok(new_id)
    }

    /// Operator transition of any record to DEPRECATED.
    pub async fn deprecate(&self, id: &str, reason: &str, now: DateTime<Utc>) -> MnemosResult<()> {
        self.fetch(id).await?;
        let patch = MetadataPatch::Status {
            status: RecordStatus::Deprecated,
            at: now,
            reason: Some(reason.to_string()),
        };
        bounded(self.timeout, "set_metadata", self.store.set_metadata(id, patch)).await?;
        events::record_deprecated(id, reason);
        Ok(())
    }

    /// Records whose cross-reference tags match `topic`, with the same
    /// temporal and status weighting as search. Read-only.
    ///
    /// Only the newest `link_scan_limit` records of the group are examined.
    pub async fn cross_domain_links(
        &self,
        topic: &str,
        group: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<Vec<CrossDomainLink>> {
        let records = bounded(
            self.timeout,
            "scan",
            self.store.scan(group, self.config.link_scan_limit),
        )
        .await?;
        if records.len() >= self.config.link_scan_limit {
            events::scan_truncated("cross_domain_links", self.config.link_scan_limit);
        }

        let mut links: Vec<CrossDomainLink> = records
            .into_iter()
            .filter(|r| r.status() != RecordStatus::Deprecated)
            .filter_map(|record| {
                let matched_tags = matching_tags(&record.metadata.cross_references, topic);
                if matched_tags.is_empty() {
                    return None;
                }
                let domains = identify_domains(&record);
                let (scored, _) = score_record(record, None, now, &self.config);
                Some(CrossDomainLink {
                    scored,
                    matched_tags,
                    domains,
                })
            })
            .collect();
        links.sort_by(|a, b| rank_order(&a.scored, &b.scored));
        Ok(links)
    }

    /// Supersession history of records related to `topic`.
    ///
    /// Searches including historical and deprecated records without
    /// reclassifying, then follows successor pointers the search missed.
    pub async fn memory_evolution(
        &self,
        topic: &str,
        group: &str,
        now: DateTime<Utc>,
    ) -> MnemosResult<EvolutionTree> {
        let options = SearchOptions::from_config(&self.config)
            .with_historical(true)
            .with_deprecated(true)
            .with_limit(self.config.candidate_limit)
            .dry_run();
        let batch = self.search(topic, group, &options, now).await?;

        let mut records: Vec<Record> = batch.results.into_iter().map(|s| s.record).collect();
        let known: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
        let missing: Vec<String> = records
            .iter()
            .filter_map(|r| r.metadata.superseded_by.clone())
            .filter(|id| !known.contains(id))
            .collect();
        for id in missing {
            if let Some(successor) = bounded(self.timeout, "get", self.store.get(&id)).await? {
                records.push(successor);
            }
        }
        Ok(EvolutionTree::from_records(&records))
    }

    /// Records from `id` forward to the head of its supersession chain.
    pub async fn supersession_chain(&self, id: &str) -> MnemosResult<Vec<Record>> {
        supersession::walk_chain(self.store.as_ref(), id, self.timeout).await
    }

    /// Live per-record supersession locks.
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }

    async fn fetch(&self, id: &str) -> MnemosResult<Record> {
        bounded(self.timeout, "get", self.store.get(id))
            .await?
            .ok_or_else(|| MnemosError::not_found(id))
    }
}
