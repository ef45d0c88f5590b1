//! Best-fit ellipsoids of 3D point clouds.
//!
//! Implements:
//! - Incremental point-cloud accumulation with a running centroid.
//! - Inertia-convention second-moment tensor and its eigen-decomposition
//!   (cyclic Jacobi, no external linear-algebra solver).
//! - Semi-axes from the uniform solid ellipsoid inertia relations.
//! - Ellipsoid-frame coordinates and surface-membership predicates.

mod eigen;
mod fit;
mod types;

pub use fit::{fit_ellipsoid, DEFAULT_SURFACE_TOLERANCE, MIN_POINTS};
pub use types::{EllipsoidError, EllipsoidModel, Point3D, PointCloud, VoxelScale};
