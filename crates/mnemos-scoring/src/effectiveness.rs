//! Weighted effectiveness: `Σ(outcome · weight) / Σ(weight)`, clamped to [0, 1].

use std::collections::BTreeMap;

use mnemos_core::constants::EMPTY_SIGNAL_SCORE;
use mnemos_core::signal::SignalContribution;
use mnemos_core::{BehavioralSignal, MnemosResult, SignalCategory, SignalPolicy};

/// Score signals using the weights they carry.
///
/// No signals, or signals whose weights sum to zero, score
/// [`EMPTY_SIGNAL_SCORE`].
pub fn compute_effectiveness(signals: &[BehavioralSignal]) -> MnemosResult<f64> {
    compute_effectiveness_with(signals, &SignalPolicy::empty())
}

/// Score signals, taking each category's weight from `policy` when it has one.
pub fn compute_effectiveness_with(
    signals: &[BehavioralSignal],
    policy: &SignalPolicy,
) -> MnemosResult<f64> {
    policy.validate()?;
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for signal in signals {
        signal.validate()?;
        let weight = policy.effective_weight(signal);
        weighted += signal.outcome.as_f64() * weight;
        total_weight += weight;
    }
    if total_weight <= 0.0 {
        return Ok(EMPTY_SIGNAL_SCORE);
    }
    Ok((weighted / total_weight).clamp(0.0, 1.0))
}

#[derive(Default)]
struct Tally {
    successes: usize,
    total: usize,
    outcome_sum: f64,
    weight_sum: f64,
    weighted_sum: f64,
}

/// Per-category aggregate, in category order.
///
/// `weighted_contribution` is each category's share of the final score, so
/// the contributions sum to the score.
pub fn compute_breakdown(
    signals: &[BehavioralSignal],
    policy: &SignalPolicy,
) -> Vec<SignalContribution> {
    let mut tallies: BTreeMap<SignalCategory, Tally> = BTreeMap::new();
    let mut total_weight = 0.0;
    for signal in signals {
        let weight = policy.effective_weight(signal);
        let outcome = signal.outcome.as_f64();
        let tally = tallies.entry(signal.category.clone()).or_default();
        tally.total += 1;
        if signal.outcome.is_success() {
            tally.successes += 1;
        }
        tally.outcome_sum += outcome;
        tally.weight_sum += weight;
        tally.weighted_sum += outcome * weight;
        total_weight += weight;
    }

    tallies
        .into_iter()
        .map(|(category, t)| SignalContribution {
            category,
            successes: t.successes,
            total: t.total,
            mean_outcome: t.outcome_sum / t.total as f64,
            total_weight: t.weight_sum,
            weighted_contribution: if total_weight > 0.0 {
                t.weighted_sum / total_weight
            } else {
                0.0
            },
        })
        .collect()
}
