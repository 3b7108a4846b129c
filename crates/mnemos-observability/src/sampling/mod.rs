//! Adaptive trace sampling with a discrete, hysteretic escalation ladder.

mod ladder;
mod metrics;
mod sampler;

pub use ladder::EscalationLadder;
pub use metrics::{EscalationCause, SamplingMetrics};
pub use sampler::{AdaptiveSampler, SamplingContext, SamplingStats};
