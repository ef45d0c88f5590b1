//! Moment-tensor ellipsoid fit and ellipsoid-frame queries.

use nalgebra::Matrix3;

use super::eigen::symmetric_eigen_3x3;
use super::types::{EllipsoidError, EllipsoidModel, Point3D, PointCloud, VoxelScale};

/// Minimum number of points that define a second-moment tensor.
pub const MIN_POINTS: usize = 2;

/// Default relative tolerance of [`EllipsoidModel::is_on_surface`].
pub const DEFAULT_SURFACE_TOLERANCE: f64 = 0.01;

/// `5/2` from the inertia tensor of a solid ellipsoid of uniform density:
/// `I_a = m (b² + c²) / 5`.
const UNIFORM_ELLIPSOID_FACTOR: f64 = 2.5;

const COINCIDENT_EPS: f64 = 1e-9;

/// Fit the best ellipsoid to a point cloud from its inertia tensor.
///
/// Diagonal entries are the mean moments of inertia about each axis,
/// off-diagonals are the negated mean products, all about the running
/// centroid. The semi-axes solve the uniform solid ellipsoid relations, so
/// the major axis `a` lies along the eigenvector of the *smallest* moment.
pub fn fit_ellipsoid(cloud: &PointCloud) -> Result<EllipsoidModel, EllipsoidError> {
    if cloud.len() < MIN_POINTS {
        return Err(EllipsoidError::DegenerateInput {
            needed: MIN_POINTS,
            got: cloud.len(),
        });
    }

    let tensor = inertia_tensor(cloud.points(), cloud.centroid());
    let eig = symmetric_eigen_3x3(&tensor)
        .ok_or(EllipsoidError::NumericDegeneracy("non-finite moment tensor"))?;
    let [l0, l1, l2] = eig.values;
    tracing::debug!(
        "ellipsoid fit: n={} eigenvalues=[{:.6}, {:.6}, {:.6}]",
        cloud.len(),
        l0,
        l1,
        l2
    );

    // Radicands are clamped: planar clouds give c² = 0 up to rounding.
    let semi = |s: f64| (UNIFORM_ELLIPSOID_FACTOR * s).max(0.0).sqrt();
    let radii = [semi(l1 + l2 - l0), semi(l0 + l2 - l1), semi(l0 + l1 - l2)];
    // Running-centroid rounding leaves a tiny spread on coincident points.
    let extent = 1.0 + cloud.centroid().to_vector().norm();
    if radii[0] <= COINCIDENT_EPS * extent {
        return Err(EllipsoidError::NumericDegeneracy("all points coincide"));
    }

    let model = EllipsoidModel {
        centroid: cloud.centroid(),
        radii,
        rotation: eig.vectors,
        eigenvalues: eig.values,
    };
    tracing::debug!(
        "ellipsoid radii a={:.4} b={:.4} c={:.4} volume={:.4}",
        radii[0],
        radii[1],
        radii[2],
        model.volume()
    );
    Ok(model)
}

/// Inertia-convention second-moment tensor about `center`, normalized by
/// the number of points.
pub(crate) fn inertia_tensor(points: &[Point3D], center: Point3D) -> Matrix3<f64> {
    let mut s_xx = 0.0;
    let mut s_yy = 0.0;
    let mut s_zz = 0.0;
    let mut s_xy = 0.0;
    let mut s_xz = 0.0;
    let mut s_yz = 0.0;
    for p in points {
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        let dz = p.z - center.z;
        s_xx += dy * dy + dz * dz;
        s_yy += dx * dx + dz * dz;
        s_zz += dx * dx + dy * dy;
        s_xy += dx * dy;
        s_xz += dx * dz;
        s_yz += dy * dz;
    }
    let inv_n = 1.0 / points.len().max(1) as f64;
    Matrix3::new(
        s_xx * inv_n,
        -s_xy * inv_n,
        -s_xz * inv_n,
        -s_xy * inv_n,
        s_yy * inv_n,
        -s_yz * inv_n,
        -s_xz * inv_n,
        -s_yz * inv_n,
        s_zz * inv_n,
    )
}

impl EllipsoidModel {
    /// Coordinates of a physical point in the ellipsoid frame: centered on
    /// the centroid and rotated onto the principal axes `(a, b, c)`.
    pub fn to_local(&self, p: Point3D) -> Point3D {
        let d = (p - self.centroid).to_vector();
        Point3D::from_vector(&(self.rotation.transpose() * d))
    }

    /// `x'²/a² + y'²/b² + z'²/c²` of a physical point; 1 on the surface.
    ///
    /// `None` for a flat model (`b` or `c` zero), which has no interior.
    pub fn normalized_radius_sq(&self, p: Point3D) -> Option<f64> {
        let [a, b, c] = self.radii;
        if a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return None;
        }
        let q = self.to_local(p);
        Some(q.x * q.x / (a * a) + q.y * q.y / (b * b) + q.z * q.z / (c * c))
    }

    /// Whether a physical point lies on the ellipsoid surface within the
    /// relative `tolerance`.
    ///
    /// Points whose offset from the centroid exceeds `2a` along any world axis
    /// are rejected before rotation. A flat model (`c == 0`) has no surface.
    pub fn is_on_surface(&self, p: Point3D, tolerance: f64) -> bool {
        let lim = 2.0 * self.radii[0];
        let d = p - self.centroid;
        if d.x.abs() > lim || d.y.abs() > lim || d.z.abs() > lim {
            return false;
        }
        self.normalized_radius_sq(p).is_some_and(|r| (1.0 - r).abs() <= tolerance)
    }

    /// Whether a point lies inside or on the ellipsoid.
    pub fn contains(&self, p: Point3D) -> bool {
        self.normalized_radius_sq(p).is_some_and(|r| r <= 1.0)
    }

    /// [`Self::to_local`] for a voxel given in pixel / slice coordinates.
    pub fn voxel_in_frame(&self, x: f64, y: f64, z_slice: f64, scale: &VoxelScale) -> Point3D {
        self.to_local(scale.to_physical(x, y, z_slice))
    }

    /// [`Self::is_on_surface`] for a voxel given in pixel / slice coordinates.
    pub fn voxel_on_surface(
        &self,
        x: f64,
        y: f64,
        z_slice: f64,
        scale: &VoxelScale,
        tolerance: f64,
    ) -> bool {
        self.is_on_surface(scale.to_physical(x, y, z_slice), tolerance)
    }

    /// Physical point on the surface at spherical parameters
    /// (`theta` azimuth in the a–b plane, `phi` polar angle from the c axis).
    pub fn surface_point(&self, theta: f64, phi: f64) -> Point3D {
        let [a, b, c] = self.radii;
        let local = nalgebra::Vector3::new(
            a * theta.cos() * phi.sin(),
            b * theta.sin() * phi.sin(),
            c * phi.cos(),
        );
        self.centroid + Point3D::from_vector(&(self.rotation * local))
    }
}
