//! LOCO-EFA decomposition of closed contours.
//!
//! Implements:
//! - Elliptic Fourier coefficients of a polygon (Kuhl & Giardina, "Elliptic
//!   Fourier features of a closed contour", 1982).
//! - LOCO normalization into rotation, starting-point and handedness
//!   invariant mode contributions `L_m` (Sánchez-Corrales et al., 2018).
//! - Partial reconstruction from the first `K` LOCO-modes.
//! - Entropy and dominant-mode summaries.

mod coeffs;
mod loco;
mod reconstruct;
mod stats;
mod types;

pub use coeffs::efa_coefficients;
pub use loco::{decompose, loco_normalize, FIRST_SHAPE_MODE};
pub use stats::{shannon_entropy, ModeContribution};
pub use types::{
    EfaCoefficients, EfaConfig, EfaError, FourierModeSet, HarmonicCoeffs, LocoMode,
};
