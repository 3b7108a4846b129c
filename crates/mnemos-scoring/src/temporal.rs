use mnemos_core::{MnemosError, MnemosResult};
use mnemos_lifecycle::decay::{temporal_weight, validate_decay_factor};

/// Blend a behavioral score with its decayed value.
///
/// `blend · base + (1 − blend) · base · decay_factor^age_days`, clamped to
/// [0, 1]. A fresh record keeps its raw score; an old one tends toward
/// `blend · base`. Rejects a decay factor outside (0, 1) and a blend outside
/// [0, 1].
pub fn adjust_for_temporal_decay(
    base_score: f64,
    age_days: f64,
    decay_factor: f64,
    blend: f64,
) -> MnemosResult<f64> {
    validate_decay_factor(decay_factor)?;
    if !(0.0..=1.0).contains(&blend) {
        return Err(MnemosError::validation(
            "behavioral_blend",
            format!("{blend} is outside [0, 1]"),
        ));
    }
    let decayed = base_score * temporal_weight(age_days, decay_factor);
    Ok((blend * base_score + (1.0 - blend) * decayed).clamp(0.0, 1.0))
}
