use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::verdict::CascadeKind;

/// Summary of detector activity over the last 24 hours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CascadeStatistics {
    pub active_cascades: usize,
    pub completed_cascades_24h: usize,
    pub by_kind: BTreeMap<CascadeKind, usize>,
    pub avg_duration_seconds: f64,
    pub avg_severity: f64,
    pub total_memory_impact_24h: f64,
}

/// Risk estimate in [0, 1] with the most likely upcoming pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub score: f64,
    pub predicted: Option<CascadeKind>,
}
