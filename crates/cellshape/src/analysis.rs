//! End-to-end measurements producing serializable reports.

use serde::{Deserialize, Serialize};

use crate::contour::{distance_between_shapes, reference_circle, ClosedContour};
use crate::efa::{decompose, EfaConfig, EfaError, FourierModeSet, ModeContribution};
use crate::ellipsoid::{
    fit_ellipsoid, EllipsoidError, EllipsoidModel, PointCloud, VoxelScale,
    DEFAULT_SURFACE_TOLERANCE,
};

// ── Ellipsoid ──────────────────────────────────────────────────────────────

/// Configuration for fitting an ellipsoid to a voxel object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipsoidConfig {
    /// Physical size of one voxel.
    pub scale: VoxelScale,
    /// Relative tolerance of the surface predicate.
    pub surface_tolerance: f64,
}

impl Default for EllipsoidConfig {
    fn default() -> Self {
        Self {
            scale: VoxelScale::default(),
            surface_tolerance: DEFAULT_SURFACE_TOLERANCE,
        }
    }
}

/// Fitted ellipsoid as a results-table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidReport {
    pub n_points: usize,
    /// Centroid in physical units.
    pub centroid: [f64; 3],
    /// Centroid in voxel coordinates.
    pub centroid_px: [f64; 3],
    /// Semi-axes `[a, b, c]`, descending.
    pub radii: [f64; 3],
    pub volume: f64,
    /// `(b + c) / (2a)`.
    pub elongation: f64,
    /// Unit directions of the `a`, `b` and `c` axes.
    pub axes: [[f64; 3]; 3],
}

impl EllipsoidReport {
    pub fn new(model: &EllipsoidModel, cloud: &PointCloud) -> Self {
        let axis = |i: usize| {
            let v = model.axis(i);
            [v[0], v[1], v[2]]
        };
        Self {
            n_points: cloud.len(),
            centroid: model.centroid.to_array(),
            centroid_px: cloud.centroid_in_pixels().to_array(),
            radii: model.radii,
            volume: model.volume(),
            elongation: model.elongation(),
            axes: [axis(0), axis(1), axis(2)],
        }
    }
}

/// Fit an ellipsoid to `(x, y, z_slice)` voxels of one object.
pub fn analyze_voxels(
    voxels: &[[f64; 3]],
    config: &EllipsoidConfig,
) -> Result<(EllipsoidModel, EllipsoidReport), EllipsoidError> {
    let cloud = PointCloud::from_voxels(config.scale, voxels.iter().copied());
    let model = fit_ellipsoid(&cloud)?;
    let report = EllipsoidReport::new(&model, &cloud);
    tracing::info!(
        "ellipsoid: {} voxels, radii [{:.3}, {:.3}, {:.3}], volume {:.3}",
        report.n_points,
        report.radii[0],
        report.radii[1],
        report.radii[2],
        report.volume
    );
    Ok((model, report))
}

/// Voxels of a `dims = [width, height, slices]` grid lying on the surface of
/// `model`, within `config.surface_tolerance`.
pub fn surface_voxels(
    model: &EllipsoidModel,
    dims: [usize; 3],
    config: &EllipsoidConfig,
) -> Vec<[usize; 3]> {
    let mut out = Vec::new();
    for z in 0..dims[2] {
        for y in 0..dims[1] {
            for x in 0..dims[0] {
                if model.voxel_on_surface(
                    x as f64,
                    y as f64,
                    z as f64,
                    &config.scale,
                    config.surface_tolerance,
                ) {
                    out.push([x, y, z]);
                }
            }
        }
    }
    out
}

// ── LOCO-EFA ───────────────────────────────────────────────────────────────

/// Reconstruction-quality sweep over increasing mode cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionSweep {
    /// First cutoff `K` (inclusive).
    pub first_cutoff: usize,
    /// Last cutoff `K` (exclusive).
    pub last_cutoff: usize,
    /// Number of LOCO-modes entering the entropy.
    pub entropy_modes: usize,
    /// Resampling interval used when comparing outlines.
    pub interval: f64,
}

impl Default for ReconstructionSweep {
    fn default() -> Self {
        Self {
            first_cutoff: 2,
            last_cutoff: 50,
            entropy_modes: 50,
            interval: 1.0,
        }
    }
}

/// Distance of one reconstruction to the input outline, relative to the
/// distance of the reference circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub cutoff: usize,
    pub relative_distance: f64,
}

/// LOCO-EFA measurements of one contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocoEfaReport {
    pub perimeter: f64,
    /// DC term `(alpha_0, gamma_0)`.
    pub offset: [f64; 2],
    pub modes: Vec<ModeContribution>,
    /// `None` when every contribution in range is zero.
    pub entropy: Option<f64>,
    pub dominant_mode: Option<usize>,
    /// Mean distance from the outline to its reference circle.
    pub reference_distance: f64,
    pub sweep: Vec<SweepPoint>,
    /// Sum of the relative distances; `None` if the sweep was skipped.
    pub cumulative_distance: Option<f64>,
}

/// Decompose `contour` and score its reconstructions.
///
/// The reference is a circle on the contour centroid with half the Feret
/// diameter as radius. The sweep is skipped (with a warning) when the
/// outline coincides with that circle, since relative distances are then
/// undefined. Fails with [`EfaError::InvalidInterval`] when the outline cannot
/// be resampled at `sweep.interval`.
pub fn analyze_contour(
    contour: &ClosedContour,
    config: &EfaConfig,
    sweep: &ReconstructionSweep,
) -> Result<(FourierModeSet, LocoEfaReport), EfaError> {
    let set = decompose(contour, config)?;
    let shape = contour.deduplicated();
    if shape.resample_count(sweep.interval).is_none() {
        return Err(EfaError::InvalidInterval(sweep.interval));
    }

    let reference = reference_circle(&shape)
        .and_then(|circle| distance_between_shapes(&shape, &circle, sweep.interval))
        .ok_or(EfaError::InvalidInterval(sweep.interval))?;

    let mut points = Vec::new();
    if reference.is_finite() && reference > 0.0 {
        for cutoff in sweep.first_cutoff..sweep.last_cutoff {
            let rec = set.reconstruct(cutoff);
            let d = distance_between_shapes(&shape, &rec, sweep.interval)
                .ok_or(EfaError::InvalidInterval(sweep.interval))?;
            tracing::debug!("relative distance K={}: {:.5}", cutoff, d / reference);
            points.push(SweepPoint {
                cutoff,
                relative_distance: d / reference,
            });
        }
    } else {
        tracing::warn!("contour matches its reference circle; skipping reconstruction sweep");
    }
    let cumulative_distance = (!points.is_empty())
        .then(|| points.iter().map(|p| p.relative_distance).sum::<f64>());

    let report = LocoEfaReport {
        perimeter: set.period(),
        offset: set.offset(),
        modes: set.contribution_table(),
        entropy: set.entropy(sweep.entropy_modes),
        dominant_mode: set.max_contribution_mode(),
        reference_distance: reference,
        sweep: points,
        cumulative_distance,
    };
    tracing::info!(
        "LOCO-EFA: perimeter {:.3}, entropy {:?}, dominant mode {:?}",
        report.perimeter,
        report.entropy,
        report.dominant_mode
    );
    Ok((set, report))
}
