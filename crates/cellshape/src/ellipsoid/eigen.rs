//! Symmetric 3×3 eigensolver (cyclic Jacobi rotations).

use nalgebra::Matrix3;

const MAX_SWEEPS: usize = 64;

/// Eigen-decomposition of a real symmetric 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SymmetricEigen3 {
    /// Eigenvalues in ascending order.
    pub values: [f64; 3],
    /// Orthonormal eigenvectors as columns, in the order of `values`.
    pub vectors: Matrix3<f64>,
}

/// Diagonalize a symmetric matrix with cyclic Jacobi sweeps.
///
/// Only the upper triangle drives the rotations; the input is assumed
/// symmetric. Each eigenvector is sign-normalized so that its component of
/// largest magnitude is positive, which makes the output deterministic.
///
/// Returns `None` on non-finite input.
pub(crate) fn symmetric_eigen_3x3(m: &Matrix3<f64>) -> Option<SymmetricEigen3> {
    if m.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut a = *m;
    let mut v = Matrix3::<f64>::identity();
    let scale = a.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 {
        return Some(SymmetricEigen3 {
            values: [0.0; 3],
            vectors: v,
        });
    }
    let tol = (scale * f64::EPSILON).powi(2);

    for _ in 0..MAX_SWEEPS {
        let off = a[(0, 1)].powi(2) + a[(0, 2)].powi(2) + a[(1, 2)].powi(2);
        if off <= tol {
            break;
        }
        for (p, q) in [(0usize, 1usize), (0, 2), (1, 2)] {
            let apq = a[(p, q)];
            if apq == 0.0 {
                continue;
            }
            // Rotation angle that zeroes a[p][q] (Golub & Van Loan, §8.5).
            let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            for k in 0..3 {
                let akp = a[(k, p)];
                let akq = a[(k, q)];
                a[(k, p)] = c * akp - s * akq;
                a[(k, q)] = s * akp + c * akq;
            }
            for k in 0..3 {
                let apk = a[(p, k)];
                let aqk = a[(q, k)];
                a[(p, k)] = c * apk - s * aqk;
                a[(q, k)] = s * apk + c * aqk;
            }
            for k in 0..3 {
                let vkp = v[(k, p)];
                let vkq = v[(k, q)];
                v[(k, p)] = c * vkp - s * vkq;
                v[(k, q)] = s * vkp + c * vkq;
            }
        }
    }

    let diag = [a[(0, 0)], a[(1, 1)], a[(2, 2)]];
    if diag.iter().any(|d| !d.is_finite()) {
        return None;
    }

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| diag[i].total_cmp(&diag[j]));

    let mut vectors = Matrix3::<f64>::zeros();
    let mut values = [0.0; 3];
    for (dst, &src) in order.iter().enumerate() {
        values[dst] = diag[src];
        let mut col = v.column(src).into_owned();
        let lead = col.iter().fold(0.0f64, |best, &x| {
            if x.abs() > best.abs() {
                x
            } else {
                best
            }
        });
        if lead < 0.0 {
            col = -col;
        }
        vectors.set_column(dst, &col);
    }

    Some(SymmetricEigen3 { values, vectors })
}
