//! Supersession history: who replaced whom, when, and why.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use mnemos_core::{Record, RecordStatus};
use serde::{Deserialize, Serialize};

/// One replacement of a record by a successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStep {
    pub successor_id: String,
    pub reason: String,
    pub when: DateTime<Utc>,
    /// Current status of the successor.
    pub status: RecordStatus,
}

/// Replaced record id to the steps that replaced it, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionTree {
    pub edges: BTreeMap<String, Vec<EvolutionStep>>,
}

impl EvolutionTree {
    /// Build the tree from successor records' supersession edges.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut tree = Self::default();
        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            if !seen.insert(record.id.as_str()) {
                continue;
            }
            let Some(edge) = &record.metadata.supersession else {
                continue;
            };
            for old_id in &edge.supersedes {
                tree.edges.entry(old_id.clone()).or_default().push(EvolutionStep {
                    successor_id: record.id.clone(),
                    reason: edge.supersession_reason.clone(),
                    when: edge.superseded_at,
                    status: record.status(),
                });
            }
        }
        for steps in tree.edges.values_mut() {
            steps.sort_by(|a, b| {
                a.when
                    .cmp(&b.when)
                    .then_with(|| a.successor_id.cmp(&b.successor_id))
            });
        }
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn successors_of(&self, id: &str) -> &[EvolutionStep] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}
