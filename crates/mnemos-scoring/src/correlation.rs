//! Pearson correlation between computed scores and ground-truth outcomes.
//!
//! Used to check that implicit scoring tracks real effectiveness.

use mnemos_core::{MnemosError, MnemosResult};
use serde::{Deserialize, Serialize};

/// Minimum number of paired samples for a meaningful coefficient.
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Pearson r in [-1, 1]. Zero when either series has no variance.
    pub coefficient: f64,
    pub sample_size: usize,
    /// Two-tailed p-value from a normal approximation of the t statistic.
    pub p_value_approx: f64,
}

impl CorrelationReport {
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.coefficient > threshold
    }
}

pub fn correlate(scores: &[f64], truth: &[f64]) -> MnemosResult<CorrelationReport> {
    if scores.len() != truth.len() {
        return Err(MnemosError::validation(
            "correlation",
            format!("{} scores but {} ground-truth values", scores.len(), truth.len()),
        ));
    }
    let n = scores.len();
    if n < MIN_SAMPLES {
        return Err(MnemosError::validation(
            "correlation",
            format!("need at least {MIN_SAMPLES} samples, got {n}"),
        ));
    }
    if scores.iter().chain(truth).any(|v| !v.is_finite()) {
        return Err(MnemosError::validation("correlation", "non-finite sample"));
    }

    let mean_x = scores.iter().sum::<f64>() / n as f64;
    let mean_y = truth.iter().sum::<f64>() / n as f64;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in scores.iter().zip(truth) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return Ok(CorrelationReport {
            coefficient: 0.0,
            sample_size: n,
            p_value_approx: 1.0,
        });
    }

    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
    Ok(CorrelationReport {
        coefficient: r,
        sample_size: n,
        p_value_approx: p_value(r, n),
    })
}

fn p_value(r: f64, n: usize) -> f64 {
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let t = r * ((n as f64 - 2.0) / denom).sqrt();
    erfc(t.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
}

/// Complementary error function, Abramowitz and Stegun 7.1.26.
fn erfc(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let inner = -1.453_152_027 + t * 1.061_405_429;
    let poly = t * (0.254_829_592 + t * (-0.284_496_736 + t * (1.421_413_741 + t * inner)));
    poly * (-x * x).exp()
}
