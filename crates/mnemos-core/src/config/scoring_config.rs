use serde::{Deserialize, Serialize};

use super::defaults;

/// Implicit scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the "immediate action succeeded" signal.
    pub command_success_weight: f64,
    /// Weight of the "validation/test passed" signal.
    pub test_result_weight: f64,
    /// Weight of the "larger goal completed" signal.
    pub task_completion_weight: f64,
    /// Share of the raw behavioral score in the temporal blend. The remainder
    /// goes to the decayed score.
    pub behavioral_blend: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            command_success_weight: defaults::DEFAULT_COMMAND_SUCCESS_WEIGHT,
            test_result_weight: defaults::DEFAULT_TEST_RESULT_WEIGHT,
            task_completion_weight: defaults::DEFAULT_TASK_COMPLETION_WEIGHT,
            behavioral_blend: defaults::DEFAULT_BEHAVIORAL_BLEND,
        }
    }
}
