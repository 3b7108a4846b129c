use serde::{Deserialize, Serialize};

use super::defaults;

/// Memory lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Per-day multiplicative relevance reduction, exclusive range (0, 1).
    pub decay_factor: f64,
    /// Age in days past which an unreplaced ACTIVE record becomes HISTORICAL.
    pub historical_age_days: u32,
    /// Maximum ranked results returned by a search.
    pub search_limit: usize,
    /// Candidates requested from the store before filtering and ranking.
    pub candidate_limit: usize,
    /// Scores below this floor are flagged and rank last.
    pub score_floor: f64,
    /// Tag captured records with cross-domain references.
    pub enable_cross_references: bool,
    /// Records scanned per group when looking up cross-domain links.
    pub link_scan_limit: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            decay_factor: defaults::DEFAULT_DECAY_FACTOR,
            historical_age_days: defaults::DEFAULT_HISTORICAL_AGE_DAYS,
            search_limit: defaults::DEFAULT_SEARCH_LIMIT,
            candidate_limit: defaults::DEFAULT_CANDIDATE_LIMIT,
            score_floor: defaults::DEFAULT_SCORE_FLOOR,
            enable_cross_references: defaults::DEFAULT_ENABLE_CROSS_REFERENCES,
            link_scan_limit: defaults::DEFAULT_LINK_SCAN_LIMIT,
        }
    }
}
