//! Behavioral signals and the scores derived from them.
//!
//! Signals are ephemeral inputs. Only the resulting [`BehavioralScore`] is
//! persisted, on the metadata of the record it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{MnemosError, MnemosResult};

mod policy;

pub use policy::SignalPolicy;

/// Named category of an observed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    /// The immediate follow-on action succeeded.
    CommandSuccess,
    /// A validation or test step passed.
    TestResult,
    /// The larger goal was completed.
    TaskCompletion,
    /// Caller-defined category.
    Custom(String),
}

impl SignalCategory {
    pub fn name(&self) -> &str {
        match self {
            Self::CommandSuccess => "command_success",
            Self::TestResult => "test_result",
            Self::TaskCompletion => "task_completion",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Observed outcome of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SignalOutcome {
    Bool(bool),
    /// Partial success in [0, 1].
    Continuous(f64),
}

impl SignalOutcome {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Continuous(v) => v,
        }
    }

    /// Whether this outcome counts as a success in breakdown counts.
    pub fn is_success(self) -> bool {
        self.as_f64() >= 0.5
    }
}

/// A single behavioral observation with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralSignal {
    pub category: SignalCategory,
    pub outcome: SignalOutcome,
    /// Weight in [0, 1].
    pub weight: f64,
}

impl BehavioralSignal {
    pub fn new(category: SignalCategory, outcome: SignalOutcome, weight: f64) -> Self {
        Self {
            category,
            outcome,
            weight,
        }
    }

    /// A signal weighted by `policy` for its category.
    ///
    /// Fails when the policy has no weight for the category.
    pub fn from_policy(
        policy: &SignalPolicy,
        category: SignalCategory,
        outcome: SignalOutcome,
    ) -> MnemosResult<Self> {
        let weight = policy.weight_for(&category).ok_or_else(|| {
            MnemosError::validation("signal.category", format!("no policy weight for {category}"))
        })?;
        let signal = Self::new(category, outcome, weight);
        signal.validate()?;
        Ok(signal)
    }

    /// Reject weights or outcomes outside [0, 1], including NaN.
    pub fn validate(&self) -> MnemosResult<()> {
        if !self.weight.is_finite() || !(0.0..=1.0).contains(&self.weight) {
            return Err(MnemosError::validation(
                "signal.weight",
                format!("{} weight {} outside [0, 1]", self.category, self.weight),
            ));
        }
        let outcome = self.outcome.as_f64();
        if !outcome.is_finite() || !(0.0..=1.0).contains(&outcome) {
            return Err(MnemosError::validation(
                "signal.outcome",
                format!("{} outcome {} outside [0, 1]", self.category, outcome),
            ));
        }
        Ok(())
    }
}

/// Per-category aggregate stored as the `signal_breakdown` of a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalContribution {
    pub category: SignalCategory,
    pub successes: usize,
    pub total: usize,
    pub mean_outcome: f64,
    pub total_weight: f64,
    pub weighted_contribution: f64,
}

/// Effectiveness score attached to a record's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralScore {
    /// Effectiveness in [0, 1].
    pub value: f64,
    pub signal_breakdown: Vec<SignalContribution>,
    pub scored_at: DateTime<Utc>,
    pub scoring_version: String,
}
