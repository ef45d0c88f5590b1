//! Cyclic finite differences and circular-window smoothing for closed curves.

/// Central first difference `(z[i+1] - z[i-1]) / 2` with cyclic indexing.
pub fn cyclic_first_difference(z: &[f64]) -> Vec<f64> {
    let n = z.len();
    (0..n)
        .map(|i| (z[(i + 1) % n] - z[(i + n - 1) % n]) / 2.0)
        .collect()
}

/// Central second difference `z[i+1] - 2 z[i] + z[i-1]` with cyclic indexing.
pub fn cyclic_second_difference(z: &[f64]) -> Vec<f64> {
    let n = z.len();
    (0..n)
        .map(|i| z[(i + 1) % n] - 2.0 * z[i] + z[(i + n - 1) % n])
        .collect()
}

/// Mean over the cyclic window `[mid - half_width, mid + half_width]`.
///
/// Offsets `k = 0..=half_width` are taken on both sides, so the center sample
/// is counted twice: with `half_width = 1` the weights are `1/4, 2/4, 1/4`.
fn circular_window_mean(values: &[f64], mid: usize, half_width: usize) -> f64 {
    let n = values.len();
    let mut sum = 0.0;
    for k in 0..=half_width {
        sum += values[(mid + k) % n];
        sum += values[(mid + n - k % n) % n];
    }
    sum / (2 * (half_width + 1)) as f64
}

/// Smooth a cyclic signal with [`circular_window_mean`] at every sample.
pub fn smooth_circular(values: &[f64], half_width: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| circular_window_mean(values, i, half_width))
        .collect()
}
