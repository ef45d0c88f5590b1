//! Core 3D point, point-cloud and ellipsoid types.

use std::ops::{Add, Mul, Sub};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur while fitting an ellipsoid to a point cloud.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EllipsoidError {
    /// Too few points to define a second-moment tensor.
    #[error("degenerate input: need at least {needed} points, got {got}")]
    DegenerateInput {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
    /// The moment tensor or its eigen-decomposition is not usable.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(&'static str),
}

// ── Point3D ────────────────────────────────────────────────────────────────

/// A point in physical units (pixel coordinates already multiplied by the
/// per-axis scale).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Multiply each coordinate by its own factor.
    pub fn scaled(self, sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.z * sz)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).to_vector().norm()
    }

    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl Add for Point3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

// ── Scale ──────────────────────────────────────────────────────────────────

/// Physical size of one voxel along each axis (e.g. µm per pixel, µm per slice).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoxelScale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for VoxelScale {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

impl VoxelScale {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All three factors are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0)
    }

    /// Voxel coordinates → physical coordinates.
    pub fn to_physical(&self, x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z).scaled(self.x, self.y, self.z)
    }

    /// Physical coordinates → voxel coordinates.
    pub fn to_voxel(&self, p: Point3D) -> Point3D {
        p.scaled(1.0 / self.x, 1.0 / self.y, 1.0 / self.z)
    }
}

// ── PointCloud ─────────────────────────────────────────────────────────────

/// Append-only set of physical points with a running centroid.
///
/// The centroid is updated on every insertion as
/// `c' = (c * n + p) / (n + 1)`, so it always equals the mean of the points
/// added so far.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    points: Vec<Point3D>,
    centroid: Point3D,
    scale: VoxelScale,
}

impl PointCloud {
    /// Empty cloud with unit voxel scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cloud that converts voxel coordinates with `scale`.
    pub fn with_scale(scale: VoxelScale) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Build a cloud from points already in physical units.
    pub fn from_points<I: IntoIterator<Item = Point3D>>(points: I) -> Self {
        let mut cloud = Self::new();
        for p in points {
            cloud.add_scaled(p);
        }
        cloud
    }

    /// Build a cloud from `(x, y, z_slice)` voxel coordinates.
    pub fn from_voxels<I: IntoIterator<Item = [f64; 3]>>(scale: VoxelScale, voxels: I) -> Self {
        let mut cloud = Self::with_scale(scale);
        for [x, y, z] in voxels {
            cloud.add_voxel(x, y, z);
        }
        cloud
    }

    /// Add a voxel; the coordinates are multiplied by the cloud's scale.
    pub fn add_voxel(&mut self, x: f64, y: f64, z_slice: f64) {
        let p = self.scale.to_physical(x, y, z_slice);
        self.add_scaled(p);
    }

    /// Add a point that is already in physical units.
    pub fn add_scaled(&mut self, p: Point3D) {
        let n = self.points.len() as f64;
        self.centroid = (self.centroid * n + p) * (1.0 / (n + 1.0));
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn centroid(&self) -> Point3D {
        self.centroid
    }

    pub fn scale(&self) -> VoxelScale {
        self.scale
    }

    /// Centroid mapped back to voxel coordinates.
    pub fn centroid_in_pixels(&self) -> Point3D {
        self.scale.to_voxel(self.centroid)
    }
}

// ── EllipsoidModel ─────────────────────────────────────────────────────────

/// Best-fit ellipsoid of a point cloud.
///
/// `radii = [a, b, c]` with `a >= b >= c >= 0`. The columns of `rotation`
/// are the principal axes matching `a`, `b`, `c` in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidModel {
    pub centroid: Point3D,
    pub radii: [f64; 3],
    pub rotation: Matrix3<f64>,
    /// Ascending eigenvalues of the inertia-convention moment tensor.
    pub eigenvalues: [f64; 3],
}

impl EllipsoidModel {
    /// Major semi-axis.
    pub fn a(&self) -> f64 {
        self.radii[0]
    }

    pub fn b(&self) -> f64 {
        self.radii[1]
    }

    pub fn c(&self) -> f64 {
        self.radii[2]
    }

    /// `4/3 π a b c`.
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.radii[0] * self.radii[1] * self.radii[2]
    }

    /// `(b + c) / (2a)`: 1 for a sphere, towards 0 for a needle.
    pub fn elongation(&self) -> f64 {
        if self.radii[0] <= 0.0 {
            return 0.0;
        }
        (self.radii[1] + self.radii[2]) / (2.0 * self.radii[0])
    }

    /// Unit direction of principal axis `i` (0 = a, 1 = b, 2 = c).
    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.rotation.column(i).into_owned()
    }

    /// Check basic validity: finite values and ordered, non-negative radii.
    pub fn is_valid(&self) -> bool {
        let [a, b, c] = self.radii;
        self.centroid.is_finite()
            && self.radii.iter().all(|r| r.is_finite())
            && a >= b
            && b >= c
            && c >= 0.0
            && self.rotation.iter().all(|v| v.is_finite())
    }
}
