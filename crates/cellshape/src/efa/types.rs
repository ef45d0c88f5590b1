//! Elliptic Fourier coefficient and LOCO-mode types.

use serde::{Deserialize, Serialize};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur while decomposing a contour.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EfaError {
    /// Fewer than two distinct contour vertices.
    #[error("empty contour: need at least 2 distinct points, got {got}")]
    EmptyContour {
        /// Number of distinct vertices left after dropping repeats.
        got: usize,
    },
    /// The number of harmonics must be positive.
    #[error("invalid mode count {0}: need at least 1 harmonic")]
    InvalidModeCount(usize),
    /// The outline resampling interval is not positive, or too fine for the
    /// outline's perimeter.
    #[error("invalid resampling interval {0}")]
    InvalidInterval(f64),
    /// A normalization step would divide by zero or produced non-finite values.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(&'static str),
}

// ── Configuration ──────────────────────────────────────────────────────────

/// Configuration for a LOCO-EFA decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfaConfig {
    /// Number of raw elliptic harmonics computed in the first stage.
    pub n_modes: usize,
    /// Reconstructed contours carry `oversampling` points per input vertex.
    pub oversampling: usize,
}

impl Default for EfaConfig {
    fn default() -> Self {
        Self {
            n_modes: 100,
            oversampling: 10,
        }
    }
}

// ── Raw coefficients ───────────────────────────────────────────────────────

/// Elliptic Fourier coefficients of one harmonic:
/// `x(t) = alpha cos(ωt) + beta sin(ωt)`, `y(t) = gamma cos(ωt) + delta sin(ωt)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HarmonicCoeffs {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

impl HarmonicCoeffs {
    pub fn new(alpha: f64, beta: f64, gamma: f64, delta: f64) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            delta,
        }
    }

    /// Frobenius norm of the 2×2 coefficient block.
    pub fn amplitude(&self) -> f64 {
        (self.alpha * self.alpha
            + self.beta * self.beta
            + self.gamma * self.gamma
            + self.delta * self.delta)
            .sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.alpha.is_finite()
            && self.beta.is_finite()
            && self.gamma.is_finite()
            && self.delta.is_finite()
    }

    /// Contribution of this harmonic at phase `w = 2π m t / T`.
    pub fn evaluate(&self, w: f64) -> [f64; 2] {
        let (s, c) = w.sin_cos();
        [
            self.alpha * c + self.beta * s,
            self.gamma * c + self.delta * s,
        ]
    }
}

/// Result of the first (raw EFA) stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfaCoefficients {
    /// Perimeter of the closed contour; the period of the expansion.
    pub period: f64,
    /// DC term `(alpha_0, gamma_0)`.
    pub offset: [f64; 2],
    /// `harmonics[m - 1]` holds harmonic `m`, for `m = 1..=n_modes`.
    pub harmonics: Vec<HarmonicCoeffs>,
    /// Distinct vertices of the decomposed contour.
    pub n_points: usize,
}

impl EfaCoefficients {
    pub fn n_modes(&self) -> usize {
        self.harmonics.len()
    }

    /// Harmonic `m` (1-based); `None` outside `1..=n_modes`.
    pub fn harmonic(&self, m: usize) -> Option<&HarmonicCoeffs> {
        m.checked_sub(1).and_then(|i| self.harmonics.get(i))
    }
}

// ── LOCO modes ─────────────────────────────────────────────────────────────

/// One LOCO-mode: a counter-rotating ("plus") and a co-rotating ("minus")
/// circular component, each taken from a raw harmonic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocoMode {
    pub lambda_plus: f64,
    pub lambda_minus: f64,
    pub zeta_plus: f64,
    pub zeta_minus: f64,
    /// Raw harmonic the plus part comes from, i.e. its frequency.
    pub plus_harmonic: Option<usize>,
    /// Raw harmonic the minus part comes from, i.e. its frequency.
    pub minus_harmonic: Option<usize>,
    /// Scalar contribution `L_m`, always `>= 0`.
    pub contribution: f64,
}

impl LocoMode {
    /// `[a+, b+, c+, d+]` of the plus component.
    pub fn plus_coeffs(&self) -> HarmonicCoeffs {
        let (s, c) = self.zeta_plus.sin_cos();
        let l = self.lambda_plus;
        HarmonicCoeffs::new(l * c, -l * s, l * s, l * c)
    }

    /// `[a-, b-, c-, d-]` of the minus component.
    pub fn minus_coeffs(&self) -> HarmonicCoeffs {
        let (s, c) = self.zeta_minus.sin_cos();
        let l = self.lambda_minus;
        HarmonicCoeffs::new(l * c, -l * s, -l * s, -l * c)
    }
}

/// Full LOCO-EFA decomposition of one contour.
///
/// `modes[l]` is LOCO-mode `l` for `l = 0..=n_modes + 1`. Queries
/// (reconstruction, entropy, dominant mode) never mutate the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourierModeSet {
    pub coefficients: EfaCoefficients,
    pub modes: Vec<LocoMode>,
    /// Rotation applied to align the first harmonic (after the `ρ < 0` fix).
    pub tau1: f64,
    /// Whether β* and δ* were negated to enforce counter-clockwise handedness.
    pub handedness_flipped: bool,
    /// LOCO-mode `m >= 3` with the largest contribution, if any is positive.
    pub dominant_mode: Option<usize>,
    pub oversampling: usize,
}

impl FourierModeSet {
    pub fn period(&self) -> f64 {
        self.coefficients.period
    }

    pub fn offset(&self) -> [f64; 2] {
        self.coefficients.offset
    }

    pub fn n_modes(&self) -> usize {
        self.coefficients.n_modes()
    }

    /// `L_m` for every LOCO-mode, in mode order.
    pub fn contributions(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.contribution).collect()
    }
}
