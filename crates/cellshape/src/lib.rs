//! cellshape — shape descriptors for segmented microscopy objects.
//!
//! Two independent pipelines, each a pure function of its input:
//!
//! 1. **Ellipsoid** – best-fit ellipsoid of a 3D voxel object from its
//!    inertia tensor: centroid, semi-axes, principal directions, volume and
//!    surface/frame queries.
//! 2. **LOCO-EFA** – elliptic Fourier decomposition of a closed 2D outline,
//!    normalized into ranked LOCO-mode contributions, with partial
//!    reconstruction, entropy and dominant-mode summaries.
//!
//! Supporting modules provide contour geometry (perimeter, centroid, Feret
//! diameter, resampling, curvature) and rayon-backed batch entry points for
//! many objects or time slices.
//!
//! # Public API
//! - [`fit_ellipsoid`] with [`PointCloud`] / [`EllipsoidModel`]
//! - [`decompose`] with [`EfaConfig`] / [`FourierModeSet`]
//! - [`analyze_voxels`] and [`analyze_contour`] for serializable reports
//! - [`fit_ellipsoids`] and [`decompose_contours`] for batches

pub mod analysis;
pub mod batch;
pub mod contour;
pub mod efa;
pub mod ellipsoid;

#[cfg(test)]
mod test_utils;

pub use analysis::{
    analyze_contour, analyze_voxels, surface_voxels, EllipsoidConfig, EllipsoidReport,
    LocoEfaReport, ReconstructionSweep, SweepPoint,
};
pub use batch::{analyze_contours, decompose_contours, fit_ellipsoids};
pub use contour::{curvature_profile, ClosedContour, CurvatureProfile};
pub use efa::{
    decompose, EfaConfig, EfaError, FourierModeSet, HarmonicCoeffs, LocoMode, ModeContribution,
};
pub use ellipsoid::{
    fit_ellipsoid, EllipsoidError, EllipsoidModel, Point3D, PointCloud, VoxelScale,
};
