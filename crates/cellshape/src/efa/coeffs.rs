//! Stage A: elliptic Fourier coefficients (Kuhl & Giardina) of a closed polygon.

use std::f64::consts::PI;

use super::types::{EfaCoefficients, EfaError, HarmonicCoeffs};
use crate::contour::ClosedContour;

/// Raw elliptic Fourier expansion of `contour` up to harmonic `n_modes`.
///
/// Consecutive duplicate vertices are dropped first; the polygon is closed
/// implicitly by the segment back to the first vertex. The parameter of the
/// expansion is arclength, so the period is the perimeter.
pub fn efa_coefficients(
    contour: &ClosedContour,
    n_modes: usize,
) -> Result<EfaCoefficients, EfaError> {
    if n_modes == 0 {
        return Err(EfaError::InvalidModeCount(n_modes));
    }
    let contour = contour.deduplicated();
    let n = contour.len();
    if n <= 1 {
        return Err(EfaError::EmptyContour { got: n });
    }

    // Samples 0..=n with the first vertex repeated at the end.
    let pts: Vec<[f64; 2]> = contour
        .points()
        .iter()
        .chain(contour.points().first())
        .copied()
        .collect();
    let mut dx = vec![0.0; n + 1];
    let mut dy = vec![0.0; n + 1];
    let mut dt = vec![0.0; n + 1];
    let mut t = vec![0.0; n + 1];
    for i in 1..=n {
        dx[i] = pts[i][0] - pts[i - 1][0];
        dy[i] = pts[i][1] - pts[i - 1][1];
        dt[i] = dx[i].hypot(dy[i]);
        t[i] = t[i - 1] + dt[i];
    }
    let period = t[n];
    if !period.is_finite() || period <= 0.0 {
        return Err(EfaError::NumericDegeneracy("contour perimeter is zero or non-finite"));
    }

    let offset = dc_offset(pts[0], &dx, &dy, &dt, &t, period);

    let mut harmonics = Vec::with_capacity(n_modes);
    for m in 1..=n_modes {
        let omega = 2.0 * PI * m as f64 / period;
        let mut h = HarmonicCoeffs::default();
        let (mut s_prev, mut c_prev) = (0.0, 1.0);
        for i in 1..=n {
            let (s, c) = (omega * t[i]).sin_cos();
            let (dc, ds) = (c - c_prev, s - s_prev);
            let (vx, vy) = (dx[i] / dt[i], dy[i] / dt[i]);
            h.alpha += vx * dc;
            h.beta += vx * ds;
            h.gamma += vy * dc;
            h.delta += vy * ds;
            s_prev = s;
            c_prev = c;
        }
        let k = period / (2.0 * (m * m) as f64 * PI * PI);
        let h = HarmonicCoeffs::new(h.alpha * k, h.beta * k, h.gamma * k, h.delta * k);
        if !h.is_finite() {
            return Err(EfaError::NumericDegeneracy("non-finite harmonic coefficients"));
        }
        harmonics.push(h);
    }

    tracing::debug!(
        "EFA: n={} T={:.4} A0=({:.4}, {:.4}) modes={}",
        n,
        period,
        offset[0],
        offset[1],
        n_modes
    );
    Ok(EfaCoefficients {
        period,
        offset,
        harmonics,
        n_points: n,
    })
}

/// Closed-form DC term: the mean position over arclength of the piecewise
/// linear curve starting at `start`.
fn dc_offset(
    start: [f64; 2],
    dx: &[f64],
    dy: &[f64],
    dt: &[f64],
    t: &[f64],
    period: f64,
) -> [f64; 2] {
    let mut a0 = start[0];
    let mut c0 = start[1];
    let (mut sum_dx, mut sum_dy, mut sum_dt) = (0.0, 0.0, 0.0);
    for k in 1..dt.len() {
        let xi = sum_dx - dx[k] / dt[k] * sum_dt;
        let eps = sum_dy - dy[k] / dt[k] * sum_dt;
        sum_dx += dx[k];
        sum_dy += dy[k];
        sum_dt += dt[k];

        let t_sq = t[k] * t[k] - t[k - 1] * t[k - 1];
        let span = t[k] - t[k - 1];
        a0 += (dx[k] / (2.0 * dt[k]) * t_sq + xi * span) / period;
        c0 += (dy[k] / (2.0 * dt[k]) * t_sq + eps * span) / period;
    }
    [a0, c0]
}
