//! cellshape CLI — ellipsoid fitting and LOCO-EFA shape analysis from JSON.

use std::path::{Path, PathBuf};

use cellshape::contour::{curvature_profile, ClosedContour};
use cellshape::{
    analysis, batch, EfaConfig, EllipsoidConfig, EllipsoidReport, LocoEfaReport,
    ReconstructionSweep, VoxelScale,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cellshape")]
#[command(about = "Fit ellipsoids to voxel objects and decompose outlines with LOCO-EFA")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a best-fit ellipsoid to the voxels of one object.
    Ellipsoid(CliEllipsoidArgs),

    /// LOCO-EFA decomposition and reconstruction sweep of one or more outlines.
    LocoEfa(CliLocoArgs),

    /// Curvature profile along an outline.
    Curvature(CliCurvatureArgs),
}

#[derive(Debug, Clone, Args)]
struct CliEllipsoidArgs {
    /// Voxel list (JSON: {"voxels": [[x, y, z_slice], ...]}).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the report (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    scale: CliScaleArgs,

    /// Relative tolerance of the surface predicate.
    #[arg(long, default_value_t = 0.01)]
    surface_tolerance: f64,

    /// Also list surface voxels of a WIDTH x HEIGHT x SLICES grid.
    #[arg(long, num_args = 3, value_names = ["WIDTH", "HEIGHT", "SLICES"])]
    surface_grid: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Args)]
struct CliScaleArgs {
    /// Physical size of a pixel along x.
    #[arg(long, default_value_t = 1.0)]
    scale_x: f64,
    /// Physical size of a pixel along y.
    #[arg(long, default_value_t = 1.0)]
    scale_y: f64,
    /// Physical distance between slices.
    #[arg(long, default_value_t = 1.0)]
    scale_z: f64,
}

impl CliScaleArgs {
    fn to_core(&self) -> CliResult<VoxelScale> {
        let scale = VoxelScale::new(self.scale_x, self.scale_y, self.scale_z);
        if !scale.is_valid() {
            return Err("invalid voxel scale: factors must be finite and positive".into());
        }
        Ok(scale)
    }
}

#[derive(Debug, Clone, Args)]
struct CliLocoArgs {
    /// Outline file(s) (JSON: {"points": [[x, y], ...]}); one result per file.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Path to write the reports (JSON array). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of elliptic harmonics.
    #[arg(long, default_value_t = 100)]
    modes: usize,

    /// Reconstructed points per input vertex.
    #[arg(long, default_value_t = 10)]
    oversampling: usize,

    /// First reconstruction cutoff of the sweep (inclusive).
    #[arg(long, default_value_t = 2)]
    first_cutoff: usize,

    /// Last reconstruction cutoff of the sweep (exclusive).
    #[arg(long, default_value_t = 50)]
    last_cutoff: usize,

    /// Number of LOCO-modes entering the entropy.
    #[arg(long, default_value_t = 50)]
    entropy_modes: usize,

    /// Resampling interval when comparing outlines.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Include the outline reconstructed from this many LOCO-modes.
    #[arg(long)]
    reconstruct: Option<usize>,
}

impl CliLocoArgs {
    fn to_config(&self) -> CliResult<(EfaConfig, ReconstructionSweep)> {
        if self.modes == 0 {
            return Err("--modes must be at least 1".into());
        }
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err("--interval must be finite and positive".into());
        }
        let config = EfaConfig {
            n_modes: self.modes,
            oversampling: self.oversampling.max(1),
        };
        let sweep = ReconstructionSweep {
            first_cutoff: self.first_cutoff,
            last_cutoff: self.last_cutoff,
            entropy_modes: self.entropy_modes,
            interval: self.interval,
        };
        Ok((config, sweep))
    }
}

#[derive(Debug, Clone, Args)]
struct CliCurvatureArgs {
    /// Outline (JSON: {"points": [[x, y], ...]}).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the profile (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Resample the outline at this arclength interval first.
    #[arg(long)]
    interval: Option<f64>,

    /// Only write the summary, not the per-vertex samples.
    #[arg(long)]
    summary_only: bool,
}

impl CliCurvatureArgs {
    fn prepare(&self, points: Vec<[f64; 2]>) -> CliResult<ClosedContour> {
        let contour = ClosedContour::new(points).deduplicated();
        let Some(interval) = self.interval else {
            return Ok(contour);
        };
        if !interval.is_finite() || interval <= 0.0 {
            return Err("--interval must be finite and positive".into());
        }
        if contour.resample_count(interval).is_none() {
            return Err(format!(
                "--interval {} is too fine for an outline of perimeter {:.3}",
                interval,
                contour.perimeter()
            )
            .into());
        }
        Ok(contour.interpolated(interval))
    }
}

// ── JSON formats ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct VoxelInput {
    voxels: Vec<[f64; 3]>,
}

#[derive(Debug, Deserialize)]
struct ContourInput {
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct EllipsoidOutput {
    #[serde(flatten)]
    report: EllipsoidReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    surface_voxels: Option<Vec<[usize; 3]>>,
}

#[derive(Debug, Serialize)]
struct LocoOutput {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<LocoEfaReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconstruction: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| -> CliError {
        format!("Failed to read {}: {}", path.display(), e).into()
    })?;
    serde_json::from_str(&text).map_err(|e| -> CliError {
        format!("Failed to parse {}: {}", path.display(), e).into()
    })
}

fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ellipsoid(args) => run_ellipsoid(&args),
        Commands::LocoEfa(args) => run_loco_efa(&args),
        Commands::Curvature(args) => run_curvature(&args),
    }
}

// ── ellipsoid ──────────────────────────────────────────────────────────

fn run_ellipsoid(args: &CliEllipsoidArgs) -> CliResult<()> {
    tracing::info!("Loading voxels: {}", args.input.display());
    let input: VoxelInput = read_json(&args.input)?;
    let config = EllipsoidConfig {
        scale: args.scale.to_core()?,
        surface_tolerance: args.surface_tolerance,
    };

    let (model, report) = analysis::analyze_voxels(&input.voxels, &config)?;
    let surface_voxels = match args.surface_grid.as_deref() {
        Some(&[w, h, d]) => {
            let shell = analysis::surface_voxels(&model, [w, h, d], &config);
            tracing::info!("{} surface voxels in {}x{}x{} grid", shell.len(), w, h, d);
            Some(shell)
        }
        _ => None,
    };

    write_json(
        &EllipsoidOutput {
            report,
            surface_voxels,
        },
        args.out.as_deref(),
    )
}

// ── loco-efa ───────────────────────────────────────────────────────────

fn run_loco_efa(args: &CliLocoArgs) -> CliResult<()> {
    let (config, sweep) = args.to_config()?;
    let mut contours = Vec::with_capacity(args.input.len());
    for path in &args.input {
        let input: ContourInput = read_json(path)?;
        contours.push(ClosedContour::new(input.points));
    }
    tracing::info!(
        "Decomposing {} outline(s) with {} harmonics",
        contours.len(),
        config.n_modes
    );

    let results = batch::analyze_contours(&contours, &config, &sweep);
    let mut outputs = Vec::with_capacity(results.len());
    for (path, result) in args.input.iter().zip(results) {
        let input = path.display().to_string();
        let output = match result {
            Ok((set, report)) => LocoOutput {
                input,
                report: Some(report),
                reconstruction: args.reconstruct.map(|k| set.reconstruct(k).into_points()),
                error: None,
            },
            Err(e) => {
                tracing::warn!("{}: {}", input, e);
                LocoOutput {
                    input,
                    report: None,
                    reconstruction: None,
                    error: Some(e.to_string()),
                }
            }
        };
        outputs.push(output);
    }

    write_json(&outputs, args.out.as_deref())
}

// ── curvature ──────────────────────────────────────────────────────────

fn run_curvature(args: &CliCurvatureArgs) -> CliResult<()> {
    let input: ContourInput = read_json(&args.input)?;
    let contour = args.prepare(input.points)?;
    let profile = curvature_profile(&contour)
        .ok_or_else(|| -> CliError { "curvature needs at least 3 distinct points".into() })?;
    tracing::info!(
        "Curvature: mean {:.5}, flat proportion {:.3}",
        profile.summary.mean,
        profile.summary.flat_proportion
    );

    if args.summary_only {
        write_json(&profile.summary, args.out.as_deref())
    } else {
        write_json(&profile, args.out.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loco_args_map_to_config() {
        let cli = Cli::parse_from([
            "cellshape",
            "loco-efa",
            "--input",
            "a.json",
            "b.json",
            "--modes",
            "40",
            "--last-cutoff",
            "20",
            "--interval",
            "0.5",
        ]);
        let Commands::LocoEfa(args) = cli.command else {
            panic!("expected loco-efa");
        };
        assert_eq!(args.input.len(), 2);
        let (config, sweep) = args.to_config().unwrap();
        assert_eq!(config.n_modes, 40);
        assert_eq!(config.oversampling, 10);
        assert_eq!(sweep.first_cutoff, 2);
        assert_eq!(sweep.last_cutoff, 20);
        assert_eq!(sweep.entropy_modes, 50);
        assert_eq!(sweep.interval, 0.5);
    }

    #[test]
    fn test_loco_args_reject_zero_modes() {
        let cli = Cli::parse_from(["cellshape", "loco-efa", "--input", "a.json", "--modes", "0"]);
        let Commands::LocoEfa(args) = cli.command else {
            panic!("expected loco-efa");
        };
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_curvature_interval_validation() {
        let square = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let parse = |interval: &str| {
            let cli = Cli::parse_from([
                "cellshape",
                "curvature",
                "--input",
                "c.json",
                "--interval",
                interval,
            ]);
            let Commands::Curvature(args) = cli.command else {
                panic!("expected curvature");
            };
            args
        };
        assert_eq!(parse("1").prepare(square.clone()).unwrap().len(), 40);
        assert!(parse("1e-300").prepare(square.clone()).is_err());
        assert!(parse("0").prepare(square.clone()).is_err());
        assert!(parse("inf").prepare(square.clone()).is_err());

        let cli = Cli::parse_from(["cellshape", "curvature", "--input", "c.json"]);
        let Commands::Curvature(args) = cli.command else {
            panic!("expected curvature");
        };
        assert_eq!(args.prepare(square).unwrap().len(), 4);
    }

    #[test]
    fn test_ellipsoid_args_map_scale() {
        let cli = Cli::parse_from([
            "cellshape",
            "ellipsoid",
            "--input",
            "v.json",
            "--scale-z",
            "2.5",
            "--surface-grid",
            "64",
            "32",
            "8",
        ]);
        let Commands::Ellipsoid(args) = cli.command else {
            panic!("expected ellipsoid");
        };
        assert_eq!(args.scale.to_core().unwrap(), VoxelScale::new(1.0, 1.0, 2.5));
        assert_eq!(args.surface_grid, Some(vec![64, 32, 8]));

        let bad = CliScaleArgs {
            scale_x: 0.0,
            scale_y: 1.0,
            scale_z: 1.0,
        };
        assert!(bad.to_core().is_err());
    }

    #[test]
    fn test_parse_inputs() {
        let v: VoxelInput = serde_json::from_str(r#"{"voxels": [[1, 2, 3], [4.5, 5, 6]]}"#).unwrap();
        assert_eq!(v.voxels, vec![[1.0, 2.0, 3.0], [4.5, 5.0, 6.0]]);
        let c: ContourInput = serde_json::from_str(r#"{"points": [[0, 0], [1, 0], [1, 1]]}"#).unwrap();
        assert_eq!(c.points.len(), 3);
        assert!(serde_json::from_str::<ContourInput>(r#"{"points": [[0, 0, 1]]}"#).is_err());
    }
}
