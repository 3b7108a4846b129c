//! Temporal decay: `decay_factor ^ age_days` over fractional days.

use chrono::{DateTime, Utc};
use mnemos_core::constants::SECONDS_PER_DAY;
use mnemos_core::{MnemosError, MnemosResult};

/// Fractional age in days. A record from the future has age 0.
pub fn age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - created_at).num_milliseconds().max(0) as f64;
    millis / 1_000.0 / SECONDS_PER_DAY
}

/// Multiplier in (0, 1] for a record `age_days` old.
///
/// Non-increasing in `age_days` for any factor in (0, 1).
pub fn temporal_weight(age_days: f64, decay_factor: f64) -> f64 {
    decay_factor.powf(age_days.max(0.0))
}

pub fn validate_decay_factor(decay_factor: f64) -> MnemosResult<()> {
    if decay_factor > 0.0 && decay_factor < 1.0 {
        Ok(())
    } else {
        Err(MnemosError::validation(
            "decay_factor",
            format!("{decay_factor} is outside the open range (0, 1)"),
        ))
    }
}
