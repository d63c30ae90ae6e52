//! Chroma normalization strategies

use super::Chroma;

/// Divide by the largest entry; a silent vector stays all zero
pub fn normalize_max(chroma: &Chroma) -> Chroma {
    let max = chroma.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return [0.0; 12];
    }
    let mut out = [0.0; 12];
    for (o, &c) in out.iter_mut().zip(chroma) {
        *o = c.max(0.0) / max;
    }
    out
}

/// Clamp negatives to zero and scale to unit sum
///
/// Returns `None` when nothing positive remains.
pub fn normalize_sum(chroma: &Chroma) -> Option<Chroma> {
    let mut out = [0.0; 12];
    for (o, &c) in out.iter_mut().zip(chroma) {
        *o = c.max(0.0);
    }
    let sum: f32 = out.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    for o in &mut out {
        *o /= sum;
    }
    Some(out)
}
