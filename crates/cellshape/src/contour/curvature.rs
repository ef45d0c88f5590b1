//! Discrete curvature along a closed outline.

use serde::{Deserialize, Serialize};

use super::smooth::{cyclic_first_difference, cyclic_second_difference, smooth_circular};
use super::{distance, ClosedContour};

/// Curvature at or below this value marks a vertex as flat.
pub const FLAT_CURVATURE: f64 = 1e-3;

/// Half-width of the window applied to the derivative signals.
const DERIVATIVE_SMOOTHING: usize = 1;

/// Curvature at a single vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvatureSample {
    pub x: f64,
    pub y: f64,
    /// Unsigned curvature `|x'y'' - y'x''| / (x'² + y'²)^(3/2)`.
    pub curvature: f64,
    /// Radius of curvature `1 / curvature`; `None` where the curvature is zero.
    pub radius: Option<f64>,
    pub is_flat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvatureSummary {
    /// Sum of the half-edge averages around each vertex.
    pub perimeter: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub sd: f64,
    pub max: f64,
    pub min: f64,
    /// Share of the perimeter carried by flat vertices.
    pub flat_proportion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvatureProfile {
    pub samples: Vec<CurvatureSample>,
    pub summary: CurvatureSummary,
}

/// Curvature profile of a closed outline.
///
/// Derivatives are cyclic central differences, each smoothed with a
/// half-width 1 circular window before combining. The outline is used as
/// given; resample it first (e.g. [`ClosedContour::interpolated`]) for a
/// uniform spacing. Returns `None` for fewer than 3 vertices.
pub fn curvature_profile(contour: &ClosedContour) -> Option<CurvatureProfile> {
    let n = contour.len();
    if n < 3 {
        return None;
    }
    let xs: Vec<f64> = contour.points().iter().map(|p| p[0]).collect();
    let ys: Vec<f64> = contour.points().iter().map(|p| p[1]).collect();

    let xp = smooth_circular(&cyclic_first_difference(&xs), DERIVATIVE_SMOOTHING);
    let yp = smooth_circular(&cyclic_first_difference(&ys), DERIVATIVE_SMOOTHING);
    let xpp = smooth_circular(&cyclic_second_difference(&xs), DERIVATIVE_SMOOTHING);
    let ypp = smooth_circular(&cyclic_second_difference(&ys), DERIVATIVE_SMOOTHING);

    let pts = contour.points();
    let mut samples = Vec::with_capacity(n);
    let mut perimeter = 0.0;
    let mut flat_length = 0.0;
    for i in 0..n {
        let speed_sq = xp[i] * xp[i] + yp[i] * yp[i];
        let curvature = if speed_sq > 0.0 {
            (xp[i] * ypp[i] - yp[i] * xpp[i]).abs() / speed_sq.powf(1.5)
        } else {
            0.0
        };
        let is_flat = curvature <= FLAT_CURVATURE;

        let here = pts[i];
        let next = distance(here, pts[(i + 1) % n]);
        let prev = distance(here, pts[(i + n - 1) % n]);
        let half_edges = 0.5 * (next + prev);
        perimeter += half_edges;
        if is_flat {
            flat_length += half_edges;
        }

        samples.push(CurvatureSample {
            x: here[0],
            y: here[1],
            curvature,
            radius: (curvature > 0.0).then_some(1.0 / curvature),
            is_flat,
        });
    }

    let count = n as f64;
    let mean = samples.iter().map(|s| s.curvature).sum::<f64>() / count;
    let var = samples
        .iter()
        .map(|s| (s.curvature - mean).powi(2))
        .sum::<f64>()
        / count;
    let (min, max) = samples.iter().fold((f64::INFINITY, 0.0f64), |(lo, hi), s| {
        (lo.min(s.curvature), hi.max(s.curvature))
    });
    let summary = CurvatureSummary {
        perimeter,
        mean,
        sd: var.sqrt(),
        max,
        min,
        flat_proportion: if perimeter > 0.0 {
            flat_length / perimeter
        } else {
            0.0
        },
    };
    tracing::debug!(
        "curvature profile: n={} mean={:.5} sd={:.5} flat={:.3}",
        n,
        summary.mean,
        summary.sd,
        summary.flat_proportion
    );
    Some(CurvatureProfile { samples, summary })
}
