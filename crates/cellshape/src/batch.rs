//! Independent per-object fits on the rayon thread pool.
//!
//! Each input yields its own `Result`; a failure on one object leaves the
//! others untouched. Output order matches input order.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::analysis::{analyze_contour, LocoEfaReport, ReconstructionSweep};
use crate::contour::ClosedContour;
use crate::efa::{decompose, EfaConfig, EfaError, FourierModeSet};
use crate::ellipsoid::{fit_ellipsoid, EllipsoidError, EllipsoidModel, PointCloud};

/// Fit one ellipsoid per cloud (e.g. one per segmented object).
pub fn fit_ellipsoids(clouds: &[PointCloud]) -> Vec<Result<EllipsoidModel, EllipsoidError>> {
    let out: Vec<_> = clouds.par_iter().map(fit_ellipsoid).collect();
    tracing::debug!(
        "batch ellipsoid fit: {} clouds, {} failed",
        out.len(),
        out.iter().filter(|r| r.is_err()).count()
    );
    out
}

/// Decompose one contour per input (e.g. one per time slice).
pub fn decompose_contours(
    contours: &[ClosedContour],
    config: &EfaConfig,
) -> Vec<Result<FourierModeSet, EfaError>> {
    let out: Vec<_> = contours
        .par_iter()
        .map(|c| decompose(c, config))
        .collect();
    tracing::debug!(
        "batch LOCO-EFA: {} contours, {} failed",
        out.len(),
        out.iter().filter(|r| r.is_err()).count()
    );
    out
}

/// [`analyze_contour`] for every contour.
pub fn analyze_contours(
    contours: &[ClosedContour],
    config: &EfaConfig,
    sweep: &ReconstructionSweep,
) -> Vec<Result<(FourierModeSet, LocoEfaReport), EfaError>> {
    contours
        .par_iter()
        .map(|c| analyze_contour(c, config, sweep))
        .collect()
}
