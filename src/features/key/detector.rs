//! Key estimation
//!
//! Sums all chroma frames into one pitch-class distribution, then correlates
//! it (Pearson) with the major and minor profiles at each of the 12 tonics.
//! The best of the 24 candidates is the key.
//!
//! Confidence rewards both the absolute correlation and the margin over the
//! runner-up:
//!
//! ```text
//! confidence = clamp((best + (best - second)) / 1.2, 0, 1)
//! ```

use super::templates::{profile, rotate_to_tonic};
use crate::analysis::result::{KeyEstimate, KeyMode};
use crate::features::chroma::normalization::normalize_sum;
use crate::features::chroma::Chroma;

/// Correlation of one tonic/mode candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyCandidate {
    /// Tonic pitch class
    pub tonic: u8,
    /// Mode
    pub mode: KeyMode,
    /// Pearson correlation with the rotated profile
    pub correlation: f32,
}

/// Pearson correlation coefficient of two equal-length slices
///
/// Returns 0.0 when either input has zero variance.
pub fn pearson(x: &[f32], y: &[f32]) -> f32 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = x[..n].iter().sum::<f32>() / n as f32;
    let mean_y = y[..n].iter().sum::<f32>() / n as f32;

    let mut cov = 0.0f32;
    let mut var_x = 0.0f32;
    let mut var_y = 0.0f32;
    for (&a, &b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= f32::EPSILON {
        0.0
    } else {
        cov / denom
    }
}

/// Key confidence from the best and runner-up correlations
pub fn key_confidence(best: f32, second: f32) -> f32 {
    ((best + (best - second)) / 1.2).clamp(0.0, 1.0)
}

/// Correlate a pitch-class distribution with all 24 keys
///
/// Candidates are ordered by tonic (C first), major before minor.
pub fn key_candidates(distribution: &Chroma) -> Vec<KeyCandidate> {
    let mut candidates = Vec::with_capacity(24);
    for tonic in 0..12u8 {
        let rotated = rotate_to_tonic(distribution, tonic);
        for mode in [KeyMode::Major, KeyMode::Minor] {
            candidates.push(KeyCandidate {
                tonic,
                mode,
                correlation: pearson(&rotated, profile(mode)),
            });
        }
    }
    candidates
}

/// Estimate the key of a sequence of chroma frames
///
/// # Arguments
///
/// * `chroma_frames` - Chroma vectors, one per frame
///
/// # Returns
///
/// `None` if there are no frames or the frames carry no energy. Ties keep the
/// earlier candidate.
///
/// # Example
///
/// ```
/// use tonescribe::features::key::estimate_key;
/// use tonescribe::KeyMode;
///
/// // C major scale, tonic triad emphasized
/// let mut chroma = [0.0f32; 12];
/// for (pc, weight) in [(0, 1.0), (2, 0.4), (4, 0.8), (5, 0.4), (7, 0.9), (9, 0.4), (11, 0.3)] {
///     chroma[pc] = weight;
/// }
/// let key = estimate_key(&[chroma]).unwrap();
/// assert_eq!(key.tonic_pitch_class, 0);
/// assert_eq!(key.mode, KeyMode::Major);
/// ```
pub fn estimate_key(chroma_frames: &[Chroma]) -> Option<KeyEstimate> {
    if chroma_frames.is_empty() {
        return None;
    }

    let mut total = [0.0f32; 12];
    for frame in chroma_frames {
        for (acc, &v) in total.iter_mut().zip(frame.iter()) {
            *acc += v;
        }
    }
    let distribution = normalize_sum(&total)?;

    let mut best: Option<KeyCandidate> = None;
    let mut second = f32::NEG_INFINITY;
    for candidate in key_candidates(&distribution) {
        match best {
            Some(b) if candidate.correlation <= b.correlation => {
                second = second.max(candidate.correlation);
            }
            Some(b) => {
                second = b.correlation;
                best = Some(candidate);
            }
            None => best = Some(candidate),
        }
    }

    let best = best?;
    let confidence = key_confidence(best.correlation, second);
    log::debug!(
        "Key estimate from {} frames: tonic {} {} (r={:.3}, second={:.3}, confidence={:.3})",
        chroma_frames.len(),
        best.tonic,
        best.mode,
        best.correlation,
        second,
        confidence
    );

    Some(KeyEstimate::new(best.tonic, best.mode, confidence))
}
