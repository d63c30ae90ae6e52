//! Window functions

/// Symmetric Hann window: `0.5 * (1 - cos(2*pi*i / (N - 1)))`
///
/// A single-sample window is `[1.0]`.
pub fn hann_window(size: usize) -> Vec<f32> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
        .collect()
}
