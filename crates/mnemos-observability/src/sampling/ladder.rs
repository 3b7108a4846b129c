/// Sampling probability per escalation level.
///
/// Level 0 is the base rate and `max_level` samples everything. The steps in
/// between are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationLadder {
    probabilities: Vec<f64>,
}

impl EscalationLadder {
    pub fn new(base_rate: f64, max_level: u8) -> Self {
        let base = base_rate.clamp(0.0, 1.0);
        let max_level = max_level.max(1);
        let probabilities = (0..=max_level)
            .map(|level| {
                if level == max_level {
                    1.0
                } else {
                    base + (1.0 - base) * f64::from(level) / f64::from(max_level)
                }
            })
            .collect();
        Self { probabilities }
    }

    pub fn max_level(&self) -> u8 {
        (self.probabilities.len() - 1) as u8
    }

    /// Probability at `level`, saturating at the top of the ladder.
    pub fn probability(&self, level: u8) -> f64 {
        let idx = usize::from(level).min(self.probabilities.len() - 1);
        self.probabilities[idx]
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}
