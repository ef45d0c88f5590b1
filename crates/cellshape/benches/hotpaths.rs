use std::f64::consts::PI;

use cellshape::contour::curvature_profile;
use cellshape::{decompose, fit_ellipsoid, ClosedContour, EfaConfig, PointCloud, VoxelScale};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_outline(n: usize) -> ClosedContour {
    let mut rng = StdRng::seed_from_u64(12345);
    let pts = (0..n)
        .map(|i| {
            let t = 2.0 * PI * (i as f64) / (n as f64);
            let r = 40.0 + 6.0 * (3.0 * t).cos() + 2.5 * (5.0 * t).sin();
            [
                256.0 + 1.4 * r * t.cos() + rng.gen_range(-0.3f64..0.3f64),
                256.0 + r * t.sin() + rng.gen_range(-0.3f64..0.3f64),
            ]
        })
        .collect();
    ClosedContour::new(pts)
}

fn make_voxel_blob(radii: [f64; 3]) -> PointCloud {
    let mut cloud = PointCloud::with_scale(VoxelScale::new(0.2, 0.2, 0.5));
    let [a, b, c] = radii;
    let (nx, ny, nz) = ((a / 0.2) as i32, (b / 0.2) as i32, (c / 0.5) as i32);
    for z in -nz..=nz {
        for y in -ny..=ny {
            for x in -nx..=nx {
                let (px, py, pz) = (x as f64 * 0.2, y as f64 * 0.2, z as f64 * 0.5);
                if (px / a).powi(2) + (py / b).powi(2) + (pz / c).powi(2) <= 1.0 {
                    cloud.add_voxel(x as f64 + 100.0, y as f64 + 100.0, z as f64 + 20.0);
                }
            }
        }
    }
    cloud
}

fn bench_ellipsoid_fit(c: &mut Criterion) {
    let cloud = make_voxel_blob([6.0, 4.0, 3.0]);
    c.bench_function("ellipsoid_fit_voxel_blob", |b| {
        b.iter(|| {
            let model = fit_ellipsoid(black_box(&cloud))
                .expect("deterministic fixture should always fit");
            black_box(model)
        })
    });
}

fn bench_loco_efa(c: &mut Criterion) {
    let outline = make_outline(400);
    let cfg = EfaConfig::default();
    c.bench_function("loco_efa_400pts_100modes", |b| {
        b.iter(|| {
            let set = decompose(black_box(&outline), black_box(&cfg))
                .expect("deterministic fixture should always decompose");
            black_box(set.dominant_mode)
        })
    });

    let set = decompose(&outline, &cfg).expect("deterministic fixture should always decompose");
    c.bench_function("loco_reconstruct_k20", |b| {
        b.iter(|| black_box(set.reconstruct(black_box(20)).len()))
    });
}

fn bench_curvature(c: &mut Criterion) {
    let outline = make_outline(400).interpolated(1.0);
    c.bench_function("curvature_profile_interp1", |b| {
        b.iter(|| black_box(curvature_profile(black_box(&outline)).map(|p| p.summary.mean)))
    });
}

criterion_group!(hotpaths, bench_ellipsoid_fit, bench_loco_efa, bench_curvature);
criterion_main!(hotpaths);
