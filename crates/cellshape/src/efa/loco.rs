//! Stage B: LOCO normalization of the raw harmonics.
//!
//! Every harmonic is split into a counter-rotating ("plus") and a
//! co-rotating ("minus") circle after aligning the first harmonic. The
//! circles are then regrouped into LOCO-modes by [`remap_table`] so that each
//! LOCO-mode `l` carries the parts that trace `l`-fold shape features.

use std::f64::consts::PI;

use super::coeffs::efa_coefficients;
use super::types::{
    EfaCoefficients, EfaConfig, EfaError, FourierModeSet, HarmonicCoeffs, LocoMode,
};
use crate::contour::ClosedContour;

/// First-harmonic amplitude (relative to the period) below which its
/// orientation is undefined.
const FIRST_HARMONIC_EPS: f64 = 1e-12;

/// Lowest LOCO-mode considered when reporting the dominant mode.
pub const FIRST_SHAPE_MODE: usize = 3;

/// Raw harmonics feeding one LOCO-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeSource {
    pub plus: Option<usize>,
    pub minus: Option<usize>,
}

/// Re-indexing of `n` raw harmonics into LOCO-modes `l = 0..=n + 1`.
///
/// | LOCO-mode `l` | plus part from | minus part from |
/// |---------------|----------------|-----------------|
/// | 0             | harmonic 2     | none            |
/// | 1             | harmonic 1     | none            |
/// | 2 ..= n - 1   | harmonic l + 1 | harmonic l - 1  |
/// | n             | none           | harmonic n - 1  |
/// | n + 1         | none           | harmonic n      |
///
/// Rows referring to a harmonic above `n` are empty, so for `n = 1` only
/// LOCO-modes 1 (plus) and 2 (minus) are populated. The source harmonic is
/// also the frequency of that part during reconstruction.
pub(crate) fn remap_table(n_modes: usize) -> Vec<ModeSource> {
    let harmonic = |m: usize| (1..=n_modes).contains(&m).then_some(m);
    (0..=n_modes + 1)
        .map(|l| {
            let plus = match l {
                0 => harmonic(2),
                1 => harmonic(1),
                _ => harmonic(l + 1),
            };
            let minus = if l >= 2 { harmonic(l - 1) } else { None };
            ModeSource { plus, minus }
        })
        .collect()
}

/// Plus/minus circles of one normalized harmonic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RotatingParts {
    lambda_plus: f64,
    lambda_minus: f64,
    zeta_plus: f64,
    zeta_minus: f64,
}

/// Diagonalize one harmonic: rotate the parameter by `phi` so the semi-axes
/// are orthogonal, then the plane by `theta` onto the x axis.
fn rotating_parts(h: &HarmonicCoeffs) -> RotatingParts {
    let HarmonicCoeffs {
        alpha: a,
        beta: b,
        gamma: c,
        delta: d,
    } = *h;
    let phi = 0.5 * (2.0 * (a * b + c * d)).atan2(a * a + c * c - b * b - d * d);
    let (sp, cp) = phi.sin_cos();
    let a1 = a * cp + b * sp;
    let b1 = -a * sp + b * cp;
    let c1 = c * cp + d * sp;
    let d1 = -c * sp + d * cp;

    let theta = c1.atan2(a1);
    let (st, ct) = theta.sin_cos();
    let lambda1 = ct * a1 + st * c1;
    let lambda2 = -st * b1 + ct * d1;

    RotatingParts {
        lambda_plus: 0.5 * (lambda1 + lambda2),
        lambda_minus: 0.5 * (lambda1 - lambda2),
        zeta_plus: theta - phi,
        zeta_minus: -theta - phi,
    }
}

/// Rotate every harmonic so the first one starts at its major semi-axis
/// pointing into the upper half plane, and enforce counter-clockwise
/// handedness of the first harmonic.
///
/// Returns the normalized harmonics, `tau1` and whether β/δ were negated.
fn align_first_harmonic(
    coeffs: &EfaCoefficients,
) -> Result<(Vec<HarmonicCoeffs>, f64, bool), EfaError> {
    let h1 = coeffs
        .harmonic(1)
        .ok_or(EfaError::InvalidModeCount(coeffs.n_modes()))?;
    if h1.amplitude() <= FIRST_HARMONIC_EPS * coeffs.period {
        return Err(EfaError::NumericDegeneracy(
            "first harmonic vanishes, orientation is undefined",
        ));
    }

    let num = 2.0 * (h1.alpha * h1.beta + h1.gamma * h1.delta);
    let den = h1.alpha * h1.alpha + h1.gamma * h1.gamma - h1.beta * h1.beta - h1.delta * h1.delta;
    let mut tau1 = 0.5 * num.atan2(den);
    let (s, c) = tau1.sin_cos();
    let alpha1 = h1.alpha * c + h1.beta * s;
    let gamma1 = h1.gamma * c + h1.delta * s;
    if gamma1.atan2(alpha1) < 0.0 {
        tau1 += PI;
    }

    let mut aligned: Vec<HarmonicCoeffs> = coeffs
        .harmonics
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let (s, c) = ((i + 1) as f64 * tau1).sin_cos();
            HarmonicCoeffs::new(
                h.alpha * c + h.beta * s,
                -h.alpha * s + h.beta * c,
                h.gamma * c + h.delta * s,
                -h.gamma * s + h.delta * c,
            )
        })
        .collect();

    let first = aligned[0];
    let flipped = first.alpha * first.delta - first.beta * first.gamma < 0.0;
    if flipped {
        for h in &mut aligned {
            h.beta = -h.beta;
            h.delta = -h.delta;
        }
    }
    tracing::debug!("LOCO: tau1={:.6} handedness_flipped={}", tau1, flipped);
    Ok((aligned, tau1, flipped))
}

/// Stage B on already computed raw coefficients.
pub fn loco_normalize(
    coeffs: EfaCoefficients,
    oversampling: usize,
) -> Result<FourierModeSet, EfaError> {
    let (aligned, tau1, handedness_flipped) = align_first_harmonic(&coeffs)?;
    let parts: Vec<RotatingParts> = aligned.iter().map(rotating_parts).collect();
    let part = |m: usize| parts[m - 1];

    let mut modes: Vec<LocoMode> = remap_table(coeffs.n_modes())
        .into_iter()
        .map(|src| {
            let mut mode = LocoMode {
                plus_harmonic: src.plus,
                minus_harmonic: src.minus,
                ..LocoMode::default()
            };
            if let Some(m) = src.plus {
                mode.lambda_plus = part(m).lambda_plus;
                mode.zeta_plus = part(m).zeta_plus;
            }
            if let Some(m) = src.minus {
                mode.lambda_minus = part(m).lambda_minus;
                mode.zeta_minus = part(m).zeta_minus;
            }
            mode
        })
        .collect();

    let zeta_plus_1 = modes[1].zeta_plus;
    for (l, mode) in modes.iter_mut().enumerate() {
        let (lp, lm) = (mode.lambda_plus, mode.lambda_minus);
        let cross = 2.0 * lp * lm * (mode.zeta_plus - mode.zeta_minus - 2.0 * zeta_plus_1).cos();
        // Rounding can push the radicand of a cancelling pair below zero.
        mode.contribution = (lp * lp + lm * lm + cross).max(0.0).sqrt();
        tracing::trace!(
            "LOCO mode {}: lambda+={:.6} lambda-={:.6} zeta+={:.6} zeta-={:.6} L={:.6}",
            l,
            lp,
            lm,
            mode.zeta_plus,
            mode.zeta_minus,
            mode.contribution
        );
    }
    if modes.iter().any(|m| !m.contribution.is_finite()) {
        return Err(EfaError::NumericDegeneracy("non-finite LOCO contribution"));
    }

    let dominant_mode = dominant_mode(&modes);
    tracing::debug!(
        "LOCO: {} modes, L1={:.6}, dominant mode {:?}",
        modes.len(),
        modes[1].contribution,
        dominant_mode
    );
    Ok(FourierModeSet {
        coefficients: coeffs,
        modes,
        tau1,
        handedness_flipped,
        dominant_mode,
        oversampling,
    })
}

/// First LOCO-mode `>= 3` with the largest positive contribution.
fn dominant_mode(modes: &[LocoMode]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (l, mode) in modes.iter().enumerate().skip(FIRST_SHAPE_MODE) {
        if mode.contribution > best.map_or(0.0, |(_, v)| v) {
            best = Some((l, mode.contribution));
        }
    }
    best.map(|(l, _)| l)
}

/// Full LOCO-EFA decomposition: raw coefficients, then LOCO normalization.
pub fn decompose(contour: &ClosedContour, config: &EfaConfig) -> Result<FourierModeSet, EfaError> {
    let coeffs = efa_coefficients(contour, config.n_modes)?;
    loco_normalize(coeffs, config.oversampling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::circle;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn config(n_modes: usize) -> EfaConfig {
        EfaConfig {
            n_modes,
            ..EfaConfig::default()
        }
    }

    #[test]
    fn test_remap_table_rows() {
        let t = remap_table(4);
        let rows: Vec<(Option<usize>, Option<usize>)> =
            t.iter().map(|s| (s.plus, s.minus)).collect();
        assert_eq!(
            rows,
            vec![
                (Some(2), None),
                (Some(1), None),
                (Some(3), Some(1)),
                (Some(4), Some(2)),
                (None, Some(3)),
                (None, Some(4)),
            ]
        );
    }

    #[test]
    fn test_remap_table_single_harmonic() {
        let t = remap_table(1);
        assert_eq!(t.len(), 3);
        assert_eq!(t[0], ModeSource { plus: None, minus: None });
        assert_eq!(t[1], ModeSource { plus: Some(1), minus: None });
        assert_eq!(t[2], ModeSource { plus: None, minus: Some(1) });
    }

    #[test]
    fn test_unit_square_modes() {
        let sq = ClosedContour::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let set = decompose(&sq, &config(4)).unwrap();
        assert_eq!(set.modes.len(), 6);
        assert_relative_eq!(set.period(), 4.0);
        let l = set.contributions();
        assert_relative_eq!(l[1], 0.573_159_168_250_756_2, epsilon = 1e-9);
        assert_relative_eq!(l[4], 0.063_684_352_027_861_82, epsilon = 1e-9);
        for i in [0, 2, 3, 5] {
            assert_abs_diff_eq!(l[i], 0.0, epsilon = 1e-9);
        }
        assert_eq!(set.dominant_mode, Some(4));
    }

    #[test]
    fn test_circle_is_first_loco_mode() {
        let c = circle([10.0, 20.0], 5.0, 360);
        let set = decompose(&c, &config(20)).unwrap();
        let l = set.contributions();
        assert_eq!(l.len(), 22);
        assert_relative_eq!(l[1], 5.0, max_relative = 1e-4);
        for (i, v) in l.iter().enumerate().filter(|(i, _)| *i != 1) {
            assert!(*v < 1e-9, "L{} = {}", i, v);
        }
        assert!(!set.handedness_flipped);
        assert!(l.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_clockwise_circle_flips_handedness() {
        let c = circle([0.0, 0.0], 5.0, 360).reversed();
        let set = decompose(&c, &config(20)).unwrap();
        assert!(set.handedness_flipped);
        assert_relative_eq!(set.modes[1].contribution, 5.0, max_relative = 1e-4);
    }

    #[test]
    fn test_ellipse_carries_minus_part() {
        let pts = (0..400)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / 400.0;
                [6.0 * t.cos(), 2.0 * t.sin()]
            })
            .collect();
        let set = decompose(&ClosedContour::new(pts), &config(10)).unwrap();
        let l = set.contributions();
        // A centered ellipse only has odd harmonics: L2 (minus of harmonic 1)
        // is large, odd LOCO-modes above 1 vanish.
        assert!(l[2] > 1.0);
        for i in [3, 5, 7, 9] {
            assert_abs_diff_eq!(l[i], 0.0, epsilon = 1e-6);
        }
        assert_eq!(set.dominant_mode, Some(4));
    }

    #[test]
    fn test_doubly_traced_circle_is_degenerate() {
        let pts = (0..360)
            .map(|i| {
                let t = 2.0 * std::f64::consts::TAU * i as f64 / 360.0;
                [5.0 * t.cos(), 5.0 * t.sin()]
            })
            .collect();
        let err = decompose(&ClosedContour::new(pts), &config(5)).unwrap_err();
        assert!(matches!(err, EfaError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_single_harmonic_decomposition() {
        let c = circle([0.0, 0.0], 2.0, 90);
        let set = decompose(&c, &config(1)).unwrap();
        assert_eq!(set.modes.len(), 3);
        assert_eq!(set.dominant_mode, None);
        assert_relative_eq!(set.modes[1].contribution, 2.0, max_relative = 1e-3);
    }
}
