//! Shared synthetic geometry for unit tests.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::contour::ClosedContour;
use crate::ellipsoid::{PointCloud, VoxelScale};

/// Voxelize a solid ellipsoid with semi-axes `radii`, rotated by `rotation`
/// and centered at `center`, on a grid of spacing `step` (physical units).
///
/// Voxel indices are reported relative to the grid, so the cloud scale is
/// `(step, step, step)`.
pub(crate) fn voxel_ellipsoid(
    radii: [f64; 3],
    rotation: Matrix3<f64>,
    center: [f64; 3],
    step: f64,
) -> PointCloud {
    let reach = radii[0].max(radii[1]).max(radii[2]);
    let n = (reach / step).ceil() as i64 + 1;
    let scale = VoxelScale::new(step, step, step);
    let mut cloud = PointCloud::with_scale(scale);
    let inv = rotation.transpose();
    for k in -n..=n {
        for j in -n..=n {
            for i in -n..=n {
                let d = Vector3::new(i as f64, j as f64, k as f64) * step;
                let q = inv * d;
                let r = (q[0] / radii[0]).powi(2)
                    + (q[1] / radii[1]).powi(2)
                    + (q[2] / radii[2]).powi(2);
                if r <= 1.0 {
                    cloud.add_voxel(
                        center[0] / step + i as f64,
                        center[1] / step + j as f64,
                        center[2] / step + k as f64,
                    );
                }
            }
        }
    }
    cloud
}

/// Rotation about a unit axis.
pub(crate) fn rotation(axis: [f64; 3], angle: f64) -> Matrix3<f64> {
    let axis = nalgebra::Unit::new_normalize(Vector3::from(axis));
    Rotation3::from_axis_angle(&axis, angle).into_inner()
}

/// Counter-clockwise circle sampled at `n` points.
pub(crate) fn circle(center: [f64; 2], radius: f64, n: usize) -> ClosedContour {
    let pts = (0..n)
        .map(|i| {
            let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            [center[0] + radius * t.cos(), center[1] + radius * t.sin()]
        })
        .collect();
    ClosedContour::new(pts)
}

/// Stretched, lobed star-like outline without rotational symmetry.
pub(crate) fn lobed_shape(n: usize) -> ClosedContour {
    let pts = (0..n)
        .map(|i| {
            let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let r = 3.0
                + 0.6 * (3.0 * t).cos()
                + 0.25 * (5.0 * t).sin()
                + 0.3 * (2.0 * t + 0.4).cos();
            [1.7 * r * t.cos() + 4.0, r * t.sin() - 2.0]
        })
        .collect();
    ClosedContour::new(pts)
}
