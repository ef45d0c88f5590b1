//! Contour-to-contour comparison used to score reconstructions.

use super::{distance, ClosedContour};

/// Vertices of the reference circle returned by [`reference_circle`].
const REFERENCE_CIRCLE_POINTS: usize = 360;

/// Distance from `p` to the nearest vertex of `polygon`.
///
/// Returns `None` for an empty polygon.
pub fn distance_point_to_polygon(polygon: &ClosedContour, p: [f64; 2]) -> Option<f64> {
    polygon
        .points()
        .iter()
        .map(|&q| distance(p, q))
        .min_by(f64::total_cmp)
}

/// Resampled copy of `contour`, or `None` when `interval` cannot be used
/// for a non-degenerate outline.
fn resampled(contour: &ClosedContour, interval: f64) -> Option<ClosedContour> {
    if contour.len() >= 2 && contour.perimeter() > 0.0 {
        contour.resample_count(interval)?;
    }
    Some(contour.interpolated(interval))
}

/// Mean nearest-vertex distance from `shape` to `candidate`, both resampled
/// at arclength `interval` first.
///
/// Asymmetric: every sample of `shape` is matched against `candidate`, not
/// the other way around. Cost is `O(n * m)` in the resampled sizes. Returns
/// `None` for an empty contour, or for an interval that is not positive or
/// exceeds the resampling limit of either outline.
pub fn distance_between_shapes(
    shape: &ClosedContour,
    candidate: &ClosedContour,
    interval: f64,
) -> Option<f64> {
    let sha = resampled(shape, interval)?;
    let cand = resampled(candidate, interval)?;
    if sha.is_empty() || cand.is_empty() {
        return None;
    }
    let mut total = 0.0;
    for &p in sha.points() {
        total += distance_point_to_polygon(&cand, p)?;
    }
    Some(total / sha.len() as f64)
}

/// Circle centered on the area centroid of `shape` with radius equal to
/// half its Feret diameter.
pub fn reference_circle(shape: &ClosedContour) -> Option<ClosedContour> {
    let [cx, cy] = shape.centroid()?;
    let radius = shape.feret_diameter() / 2.0;
    let pts = (0..REFERENCE_CIRCLE_POINTS)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / REFERENCE_CIRCLE_POINTS as f64;
            [cx + radius * t.cos(), cy + radius * t.sin()]
        })
        .collect();
    Some(ClosedContour::new(pts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{circle, lobed_shape};
    use approx::assert_relative_eq;

    #[test]
    fn test_point_to_polygon_uses_vertices() {
        let sq = ClosedContour::new(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        assert_relative_eq!(distance_point_to_polygon(&sq, [1.0, 1.0]).unwrap(), 2f64.sqrt());
        assert_relative_eq!(distance_point_to_polygon(&sq, [3.0, 0.0]).unwrap(), 1.0);
        assert_eq!(distance_point_to_polygon(&ClosedContour::default(), [0.0, 0.0]), None);
    }

    #[test]
    fn test_identical_shapes_have_zero_distance() {
        let s = lobed_shape(200);
        let d = distance_between_shapes(&s, &s, 1.0).unwrap();
        assert!(d < 1e-12, "d = {}", d);
    }

    #[test]
    fn test_concentric_circles() {
        let inner = circle([0.0, 0.0], 10.0, 720);
        let outer = circle([0.0, 0.0], 12.0, 720);
        let d = distance_between_shapes(&inner, &outer, 0.5).unwrap();
        assert_relative_eq!(d, 2.0, epsilon = 0.02);
    }

    #[test]
    fn test_distance_is_asymmetric() {
        // A short arc is close to the full circle, not vice versa.
        let full = circle([0.0, 0.0], 10.0, 360);
        let arc = ClosedContour::new(full.points()[..30].to_vec());
        let d_arc = distance_between_shapes(&arc, &full, 0.5).unwrap();
        let d_full = distance_between_shapes(&full, &arc, 0.5).unwrap();
        assert!(d_arc < 0.5);
        assert!(d_full > 5.0 * d_arc);
    }

    #[test]
    fn test_unusable_interval_has_no_distance() {
        let sq = ClosedContour::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(distance_between_shapes(&sq, &sq, 1e-300), None);
        assert_eq!(distance_between_shapes(&sq, &sq, 0.0), None);
        assert_eq!(distance_between_shapes(&sq, &sq, -1.0), None);
        assert_eq!(distance_between_shapes(&sq, &sq, f64::NAN), None);
        assert!(distance_between_shapes(&sq, &sq, 0.25).is_some());
    }

    #[test]
    fn test_reference_circle_matches_square() {
        let sq = ClosedContour::new(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        let c = reference_circle(&sq).unwrap();
        assert_eq!(c.len(), REFERENCE_CIRCLE_POINTS);
        for &[x, y] in c.points() {
            assert_relative_eq!((x - 1.0).hypot(y - 1.0), 2f64.sqrt(), epsilon = 1e-12);
        }
        assert!(reference_circle(&ClosedContour::default()).is_none());
    }
}
