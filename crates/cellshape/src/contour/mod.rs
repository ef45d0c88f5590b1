//! Closed 2D contours and the shared polygon helpers.
//!
//! A [`ClosedContour`] is an ordered, implicitly cyclic vertex list: the
//! segment from the last vertex back to the first is part of the outline.

mod compare;
mod curvature;
mod smooth;

pub use compare::{distance_between_shapes, distance_point_to_polygon, reference_circle};
pub use curvature::{curvature_profile, CurvatureProfile, CurvatureSample, CurvatureSummary};
pub use smooth::{cyclic_first_difference, cyclic_second_difference, smooth_circular};

use serde::{Deserialize, Serialize};

/// One closed outline, e.g. a cell boundary in a single time slice.
/// Upper bound on the samples of [`ClosedContour::interpolated`].
pub const MAX_RESAMPLED_POINTS: usize = 1 << 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosedContour {
    points: Vec<[f64; 2]>,
}

impl ClosedContour {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn into_points(self) -> Vec<[f64; 2]> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertex `i` with cyclic wrap-around; `None` for an empty contour.
    pub fn vertex(&self, i: usize) -> Option<[f64; 2]> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points[i % self.points.len()])
    }

    /// Closed chord lengths; entry `i` is the segment from vertex `i` to `i + 1`.
    pub fn chord_lengths(&self) -> Vec<f64> {
        let n = self.points.len();
        (0..n)
            .map(|i| distance(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }

    /// Total length of the closed outline.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.chord_lengths().iter().sum()
    }

    /// Signed shoelace area; positive for counter-clockwise vertex order
    /// (in a y-up frame).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut acc = 0.0;
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            acc += x0 * y1 - x1 * y0;
        }
        0.5 * acc
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Arithmetic mean of the vertices.
    pub fn vertex_centroid(&self) -> Option<[f64; 2]> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        Some([sx / n, sy / n])
    }

    /// Area centroid of the enclosed polygon.
    ///
    /// Falls back to the vertex centroid for zero-area outlines.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        let n = self.points.len();
        let a = self.signed_area();
        if n < 3 || a.abs() < 1e-12 {
            return self.vertex_centroid();
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            let cross = x0 * y1 - x1 * y0;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
        Some([cx / (6.0 * a), cy / (6.0 * a)])
    }

    /// Largest distance between any two vertices.
    pub fn feret_diameter(&self) -> f64 {
        let mut best = 0.0f64;
        for (i, &p) in self.points.iter().enumerate() {
            for &q in &self.points[i + 1..] {
                best = best.max(distance(p, q));
            }
        }
        best
    }

    /// Copy without consecutive duplicate vertices (including a closing
    /// vertex that repeats the first one).
    pub fn deduplicated(&self) -> Self {
        let mut out: Vec<[f64; 2]> = Vec::with_capacity(self.points.len());
        for &p in &self.points {
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
        while out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        Self::new(out)
    }

    /// Number of samples [`Self::interpolated`] produces for `interval`.
    ///
    /// `None` for a degenerate outline, an interval that is not positive, or
    /// one so fine that more than [`MAX_RESAMPLED_POINTS`] samples would be
    /// needed.
    pub fn resample_count(&self, interval: f64) -> Option<usize> {
        let perimeter = self.perimeter();
        if self.points.len() < 2 || !perimeter.is_finite() || perimeter <= 0.0 {
            return None;
        }
        if interval.is_nan() || interval <= 0.0 {
            return None;
        }
        let ratio = (perimeter / interval).round();
        if !ratio.is_finite() || ratio > MAX_RESAMPLED_POINTS as f64 {
            return None;
        }
        Some((ratio as usize).max(3))
    }

    /// Resample the outline at (approximately) constant arclength `interval`.
    ///
    /// The step is adjusted so that the samples divide the perimeter evenly;
    /// the first sample is the first vertex. The outline is returned
    /// unchanged when [`Self::resample_count`] is `None`.
    pub fn interpolated(&self, interval: f64) -> Self {
        let Some(count) = self.resample_count(interval) else {
            return self.clone();
        };
        let step = self.perimeter() / count as f64;

        let n = self.points.len();
        let chords = self.chord_lengths();
        let mut out = Vec::with_capacity(count);
        let mut seg = 0usize;
        let mut seg_start = 0.0;
        for k in 0..count {
            let s = k as f64 * step;
            while seg + 1 < n && seg_start + chords[seg] < s {
                seg_start += chords[seg];
                seg += 1;
            }
            let p = self.points[seg];
            let q = self.points[(seg + 1) % n];
            let f = if chords[seg] > 0.0 {
                ((s - seg_start) / chords[seg]).clamp(0.0, 1.0)
            } else {
                0.0
            };
            out.push([p[0] + f * (q[0] - p[0]), p[1] + f * (q[1] - p[1])]);
        }
        Self::new(out)
    }

    /// Apply an affine map `p -> m p + t` to every vertex.
    pub fn transformed(&self, m: [[f64; 2]; 2], t: [f64; 2]) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|&[x, y]| {
                    [
                        m[0][0] * x + m[0][1] * y + t[0],
                        m[1][0] * x + m[1][1] * y + t[1],
                    ]
                })
                .collect(),
        )
    }

    /// Same outline traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut pts = self.points.clone();
        pts.reverse();
        Self::new(pts)
    }
}

impl From<Vec<[f64; 2]>> for ClosedContour {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::new(points)
    }
}

#[inline]
pub(crate) fn distance(p: [f64; 2], q: [f64; 2]) -> f64 {
    (p[0] - q[0]).hypot(p[1] - q[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::circle;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn unit_square() -> ClosedContour {
        ClosedContour::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }

    #[test]
    fn test_square_measures() {
        let sq = unit_square();
        assert_relative_eq!(sq.perimeter(), 4.0);
        assert_relative_eq!(sq.signed_area(), 1.0);
        assert_relative_eq!(sq.reversed().signed_area(), -1.0);
        assert_eq!(sq.centroid(), Some([0.5, 0.5]));
        assert_eq!(sq.vertex_centroid(), Some([0.5, 0.5]));
        assert_relative_eq!(sq.feret_diameter(), std::f64::consts::SQRT_2);
        assert_eq!(sq.vertex(5), Some([1.0, 0.0]));
        assert_eq!(ClosedContour::default().vertex(0), None);
    }

    #[test]
    fn test_area_centroid_differs_from_vertex_mean() {
        // Dense vertices on one edge pull the vertex mean, not the area centroid.
        let c = ClosedContour::new(vec![
            [0.0, 0.0],
            [0.25, 0.0],
            [0.5, 0.0],
            [0.75, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]);
        let [cx, cy] = c.centroid().unwrap();
        assert_relative_eq!(cx, 0.5, epsilon = 1e-12);
        assert_relative_eq!(cy, 0.5, epsilon = 1e-12);
        let [_, vy] = c.vertex_centroid().unwrap();
        assert!(vy < 0.3);
    }

    #[test]
    fn test_deduplicate_drops_repeats_and_closing_vertex() {
        let c = ClosedContour::new(vec![
            [0.0, 0.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]);
        assert_eq!(
            c.deduplicated().points(),
            &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn test_interpolation_keeps_outline() {
        let sq = unit_square();
        let fine = sq.interpolated(0.1);
        assert_eq!(fine.len(), 40);
        assert_eq!(fine.points()[0], [0.0, 0.0]);
        assert_relative_eq!(fine.perimeter(), 4.0, epsilon = 1e-9);
        for &[x, y] in fine.points() {
            let on_edge = x.abs() < 1e-9
                || (x - 1.0).abs() < 1e-9
                || y.abs() < 1e-9
                || (y - 1.0).abs() < 1e-9;
            assert!(on_edge, "({}, {}) is off the square", x, y);
        }
    }

    #[test]
    fn test_interpolation_rejects_tiny_interval() {
        let sq = unit_square();
        assert_eq!(sq.resample_count(0.1), Some(40));
        assert_eq!(sq.resample_count(1e-300), None);
        assert_eq!(sq.resample_count(4.0 / (MAX_RESAMPLED_POINTS as f64 * 2.0)), None);
        assert_eq!(sq.resample_count(0.0), None);
        assert_eq!(sq.resample_count(f64::NAN), None);
        assert_eq!(sq.interpolated(1e-300), sq);
        assert_eq!(sq.interpolated(f64::MIN_POSITIVE), sq);
    }

    #[test]
    fn test_interpolation_of_circle() {
        let c = circle([3.0, -2.0], 10.0, 36);
        let fine = c.interpolated(1.0);
        assert_eq!(fine.len(), c.perimeter().round() as usize);
        for &[x, y] in fine.points() {
            let r = (x - 3.0).hypot(y + 2.0);
            assert!(r <= 10.0 + 1e-9 && r > 9.9);
        }
    }

    #[test]
    fn test_transform_and_degenerate_inputs() {
        let sq = unit_square();
        let moved = sq.transformed([[0.0, -1.0], [1.0, 0.0]], [2.0, 0.0]);
        assert_eq!(moved.points()[1], [2.0, 1.0]);
        assert_relative_eq!(moved.perimeter(), 4.0);

        let empty = ClosedContour::default();
        assert_eq!(empty.perimeter(), 0.0);
        assert_eq!(empty.centroid(), None);
        assert_eq!(empty.feret_diameter(), 0.0);
        assert!(empty.interpolated(1.0).is_empty());

        let single = ClosedContour::new(vec![[1.0, 1.0]]);
        assert_abs_diff_eq!(single.perimeter(), 0.0);
        assert_eq!(single.centroid(), Some([1.0, 1.0]));
    }
}
