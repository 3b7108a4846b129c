use std::collections::BTreeMap;

use super::{BehavioralSignal, SignalCategory, SignalOutcome};
use crate::config::ScoringConfig;
use crate::errors::{MnemosError, MnemosResult};

/// Category weights applied when scoring.
///
/// Categories without a policy weight keep the weight carried by the signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPolicy {
    weights: BTreeMap<SignalCategory, f64>,
}

impl SignalPolicy {
    /// Immediate action 0.4, validation 0.3, larger goal 0.3.
    pub fn canonical() -> Self {
        Self::from_config(&ScoringConfig::default())
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let weights = BTreeMap::from([
            (SignalCategory::CommandSuccess, config.command_success_weight),
            (SignalCategory::TestResult, config.test_result_weight),
            (SignalCategory::TaskCompletion, config.task_completion_weight),
        ]);
        Self { weights }
    }

    /// A policy with no category weights: every signal keeps its own.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, category: SignalCategory, weight: f64) -> Self {
        self.weights.insert(category, weight);
        self
    }

    pub fn weight_for(&self, category: &SignalCategory) -> Option<f64> {
        self.weights.get(category).copied()
    }

    pub fn weights(&self) -> &BTreeMap<SignalCategory, f64> {
        &self.weights
    }

    /// Effective weight of `signal` under this policy.
    pub fn effective_weight(&self, signal: &BehavioralSignal) -> f64 {
        self.weight_for(&signal.category).unwrap_or(signal.weight)
    }

    /// Build a signal carrying this policy's weight for `category`.
    pub fn signal(
        &self,
        category: SignalCategory,
        outcome: SignalOutcome,
    ) -> MnemosResult<BehavioralSignal> {
        BehavioralSignal::from_policy(self, category, outcome)
    }

    pub fn validate(&self) -> MnemosResult<()> {
        for (category, weight) in &self.weights {
            if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
                return Err(MnemosError::validation(
                    "policy.weight",
                    format!("{category} weight {weight} outside [0, 1]"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self::canonical()
    }
}
