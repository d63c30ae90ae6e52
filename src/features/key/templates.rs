//! Krumhansl-Schmuckler key profiles
//!
//! Probe-tone ratings for C major and C minor. Profiles for other tonics are
//! obtained by rotating the chroma vector rather than the profile.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*.
//! Oxford University Press.

use crate::analysis::result::KeyMode;

/// C major probe-tone profile
pub const MAJOR_PROFILE: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// C minor probe-tone profile
pub const MINOR_PROFILE: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Profile for a mode, with the tonic at index 0
pub fn profile(mode: KeyMode) -> &'static [f32; 12] {
    match mode {
        KeyMode::Major => &MAJOR_PROFILE,
        KeyMode::Minor => &MINOR_PROFILE,
    }
}

/// Rotate a chroma vector so that `tonic` lands at index 0
pub fn rotate_to_tonic(chroma: &[f32; 12], tonic: u8) -> [f32; 12] {
    let tonic = (tonic % 12) as usize;
    let mut rotated = [0.0f32; 12];
    for (i, slot) in rotated.iter_mut().enumerate() {
        *slot = chroma[(i + tonic) % 12];
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_peak_on_tonic() {
        for mode in [KeyMode::Major, KeyMode::Minor] {
            let p = profile(mode);
            let max = p.iter().cloned().fold(f32::MIN, f32::max);
            assert_eq!(p[0], max, "{} profile should peak on the tonic", mode);
        }
    }

    #[test]
    fn test_rotation() {
        let mut chroma = [0.0f32; 12];
        chroma[7] = 1.0;
        chroma[11] = 0.5;
        let rotated = rotate_to_tonic(&chroma, 7);
        assert_eq!(rotated[0], 1.0);
        assert_eq!(rotated[4], 0.5);
        assert_eq!(rotate_to_tonic(&chroma, 0), chroma);
    }
}
