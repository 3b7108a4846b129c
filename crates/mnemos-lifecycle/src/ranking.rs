//! Read-with-reclassification: score, filter and rank search candidates.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use mnemos_core::config::LifecycleConfig;
use mnemos_core::{Record, RecordStatus, SearchHit};
use serde::{Deserialize, Serialize};

use crate::decay::{age_days, temporal_weight};
use crate::reclassification::{self, Reclassification, ReclassificationDecision};

/// Relevance assumed when the store provides no ranking.
pub const DEFAULT_BASE_RELEVANCE: f64 = 1.0;

/// Caller controls for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub include_historical: bool,
    /// Only honored together with `include_historical`.
    pub include_deprecated: bool,
    pub filter_source: Option<String>,
    pub limit: usize,
    /// Candidates fetched from the store before filtering.
    pub candidate_limit: usize,
    /// Compute reclassifications without writing them.
    pub dry_run: bool,
}

impl SearchOptions {
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self {
            include_historical: false,
            include_deprecated: false,
            filter_source: None,
            limit: config.search_limit,
            candidate_limit: config.candidate_limit,
            dry_run: false,
        }
    }

    pub fn with_historical(mut self, include: bool) -> Self {
        self.include_historical = include;
        self
    }

    pub fn with_deprecated(mut self, include: bool) -> Self {
        self.include_deprecated = include;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.filter_source = Some(source.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    fn admits(&self, status: RecordStatus) -> bool {
        match status {
            RecordStatus::Active | RecordStatus::Superseded => true,
            RecordStatus::Historical => self.include_historical,
            RecordStatus::Deprecated => self.include_historical && self.include_deprecated,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&LifecycleConfig::default())
    }
}

/// One ranked result with every factor of its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: Record,
    pub age_days: f64,
    pub temporal_weight: f64,
    pub status_weight: f64,
    pub base_relevance: f64,
    pub final_score: f64,
    /// Status after reclassification, which may differ from the stored one.
    pub status: RecordStatus,
    /// Score fell below the configured floor; ranked after everything else.
    pub below_floor: bool,
}

/// Ranked results plus the reclassifications computed while producing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredBatch {
    pub results: Vec<ScoredRecord>,
    pub reclassified: Vec<Reclassification>,
    /// Reclassification writes that failed. Empty for dry runs.
    pub write_failures: Vec<String>,
}

impl ScoredBatch {
    pub fn reclassified_ids(&self) -> Vec<&str> {
        self.reclassified.iter().map(|r| r.record_id.as_str()).collect()
    }
}

/// Score one record at `now`, optionally treating it as reclassified.
pub fn score_record(
    record: Record,
    relevance: Option<f64>,
    now: DateTime<Utc>,
    config: &LifecycleConfig,
) -> (ScoredRecord, ReclassificationDecision) {
    let age = age_days(record.created_at, now);
    let decision = reclassification::evaluate(&record, age, config);
    let status = match decision {
        ReclassificationDecision::ToHistorical { .. } => RecordStatus::Historical,
        ReclassificationDecision::NoChange => record.status(),
    };
    let base_relevance = relevance
        .filter(|r| r.is_finite())
        .map_or(DEFAULT_BASE_RELEVANCE, |r| r.max(0.0));
    let temporal = temporal_weight(age, config.decay_factor);
    let status_weight = status.weight();
    let final_score = base_relevance * temporal * status_weight;

    let scored = ScoredRecord {
        record,
        age_days: age,
        temporal_weight: temporal,
        status_weight,
        base_relevance,
        final_score,
        status,
        below_floor: final_score < config.score_floor,
    };
    (scored, decision)
}

/// Rank search candidates.
///
/// Pure: reclassifications are reported, not written. Every candidate is
/// evaluated for reclassification, including ones the filters then drop.
pub fn score_and_filter(
    hits: Vec<SearchHit>,
    now: DateTime<Utc>,
    options: &SearchOptions,
    config: &LifecycleConfig,
) -> ScoredBatch {
    let mut batch = ScoredBatch::default();

    for hit in hits {
        let (scored, decision) = score_record(hit.record, hit.relevance, now, config);
        if let ReclassificationDecision::ToHistorical { age_days } = decision {
            batch.reclassified.push(Reclassification {
                record_id: scored.record.id.clone(),
                age_days,
            });
        }
        if !options.admits(scored.status) {
            continue;
        }
        if let Some(source) = options.filter_source.as_deref() {
            if scored.record.source != source {
                continue;
            }
        }
        batch.results.push(scored);
    }

    batch.results.sort_by(rank_order);
    batch.results.truncate(options.limit);
    batch
}

/// Above-floor first, then score descending, then newest first.
pub fn rank_order(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    a.below_floor
        .cmp(&b.below_floor)
        .then_with(|| b.final_score.total_cmp(&a.final_score))
        .then_with(|| b.record.created_at.cmp(&a.record.created_at))
}
