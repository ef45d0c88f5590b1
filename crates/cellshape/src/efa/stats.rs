//! Summary statistics over LOCO-mode contributions.

use serde::{Deserialize, Serialize};

use super::types::FourierModeSet;

/// One row of the per-mode contribution table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeContribution {
    pub mode: usize,
    /// `L_m`.
    pub l: f64,
    pub lambda_plus: f64,
    pub lambda_minus: f64,
    pub zeta_plus: f64,
    pub zeta_minus: f64,
}

/// Shannon entropy of the normalized contributions `values`.
///
/// Zero entries contribute nothing (`0 log 0 = 0`). Returns `None` when the
/// total is not positive.
pub fn shannon_entropy(values: &[f64]) -> Option<f64> {
    let total: f64 = values.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| v / total)
            .filter(|f| *f > 0.0)
            .map(|f| -f * f.ln())
            .sum(),
    )
}

impl FourierModeSet {
    /// Entropy of the contributions of LOCO-modes `0..k` (clamped to the
    /// available modes).
    ///
    /// Lies in `[0, ln k]`. `None` if all those contributions are zero.
    pub fn entropy(&self, k: usize) -> Option<f64> {
        let k = k.min(self.modes.len());
        let values: Vec<f64> = self.modes[..k].iter().map(|m| m.contribution).collect();
        let e = shannon_entropy(&values);
        if e.is_none() {
            tracing::warn!(
                "entropy over {} LOCO-modes is undefined: all contributions are zero",
                k
            );
        }
        e
    }

    /// LOCO-mode `>= 3` with the largest contribution, if any is positive.
    pub fn max_contribution_mode(&self) -> Option<usize> {
        self.dominant_mode
    }

    /// Per-mode contribution table in LOCO-mode order.
    pub fn contribution_table(&self) -> Vec<ModeContribution> {
        self.modes
            .iter()
            .enumerate()
            .map(|(mode, m)| ModeContribution {
                mode,
                l: m.contribution,
                lambda_plus: m.lambda_plus,
                lambda_minus: m.lambda_minus,
                zeta_plus: m.zeta_plus,
                zeta_minus: m.zeta_minus,
            })
            .collect()
    }
}
