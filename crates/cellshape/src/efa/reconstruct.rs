//! Contour reconstruction from the first LOCO-modes.

use std::f64::consts::TAU;

use super::types::{FourierModeSet, HarmonicCoeffs};
use crate::contour::ClosedContour;

impl FourierModeSet {
    /// Largest meaningful reconstruction cutoff (`n_modes + 1`).
    pub fn max_cutoff(&self) -> usize {
        self.modes.len().saturating_sub(1)
    }

    /// Circular terms `(coefficients, frequency)` summed for cutoff `k`.
    ///
    /// LOCO-modes 0 and 1 always contribute their plus part. For `k >= 2`
    /// the plus parts of LOCO-modes `2..=k-2` and the minus parts of
    /// `2..=k` are added, i.e. every part with frequency below `k`.
    fn active_terms(&self, k: usize) -> Vec<(HarmonicCoeffs, usize)> {
        let mut terms = Vec::new();
        for (l, mode) in self.modes.iter().enumerate() {
            let plus = l <= 1 || (k >= 2 && l + 2 <= k);
            let minus = k >= 2 && (2..=k).contains(&l);
            if let (true, Some(freq)) = (plus, mode.plus_harmonic) {
                terms.push((mode.plus_coeffs(), freq));
            }
            if let (true, Some(freq)) = (minus, mode.minus_harmonic) {
                terms.push((mode.minus_coeffs(), freq));
            }
        }
        terms
    }

    /// Reconstructed position at arclength parameter `t` using cutoff `k`.
    pub fn point_at(&self, t: f64, k: usize) -> [f64; 2] {
        let terms = self.active_terms(k.min(self.max_cutoff()));
        self.evaluate(&terms, t)
    }

    fn evaluate(&self, terms: &[(HarmonicCoeffs, usize)], t: f64) -> [f64; 2] {
        let period = self.period();
        let mut p = self.offset();
        for (h, freq) in terms {
            let [x, y] = h.evaluate(TAU * *freq as f64 * t / period);
            p[0] += x;
            p[1] += y;
        }
        p
    }

    /// Reconstruct a closed polygon from LOCO-modes up to cutoff `k`, with
    /// `oversampling` points per vertex of the decomposed contour.
    ///
    /// `k` is clamped to [`Self::max_cutoff`].
    pub fn reconstruct(&self, k: usize) -> ClosedContour {
        let n_samples = self.oversampling.max(1) * self.coefficients.n_points;
        self.reconstruct_with(k, n_samples)
    }

    /// [`Self::reconstruct`] with an explicit number of samples, taken at
    /// `t = i T / n_samples`.
    pub fn reconstruct_with(&self, k: usize, n_samples: usize) -> ClosedContour {
        let k = k.min(self.max_cutoff());
        let terms = self.active_terms(k);
        let step = self.period() / n_samples.max(1) as f64;
        let pts = (0..n_samples)
            .map(|i| self.evaluate(&terms, i as f64 * step))
            .collect();
        tracing::trace!("reconstructed K={} with {} points", k, n_samples);
        ClosedContour::new(pts)
    }
}
