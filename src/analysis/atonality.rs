//! Atonality scoring
//!
//! Blends four instability signals into one score in [0, 1]:
//!
//! | Signal              | Weight | Meaning                                      |
//! |---------------------|--------|----------------------------------------------|
//! | key instability     | 0.35   | `1 - key confidence` (1 with no key)         |
//! | chord mismatch      | 0.30   | `1 - mean chord confidence` (1 with no chords) |
//! | chord erraticness   | 0.15   | share of chord transitions that change label |
//! | chroma entropy      | 0.20   | mean normalized Shannon entropy per frame    |
//!
//! With no chords at all, erraticness is 1; with a single chord there are no
//! transitions and it is 0. Silent frames count as maximal entropy. Empty
//! input therefore scores exactly 1.

use serde::{Deserialize, Serialize};

use super::result::{ChordEvent, KeyEstimate};
use crate::features::chroma::normalization::normalize_sum;
use crate::features::chroma::Chroma;

/// Default decision threshold
pub const DEFAULT_ATONAL_THRESHOLD: f32 = 0.65;

const KEY_WEIGHT: f32 = 0.35;
const CHORD_MISMATCH_WEIGHT: f32 = 0.30;
const ERRATICNESS_WEIGHT: f32 = 0.15;
const ENTROPY_WEIGHT: f32 = 0.20;

/// Atonality score with its components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtonalityReport {
    /// `1 - key confidence`
    pub key_instability: f32,
    /// `1 - mean chord confidence`
    pub chord_mismatch: f32,
    /// Share of chord transitions that change label
    pub chord_erraticness: f32,
    /// Mean chroma entropy divided by `log2(12)`
    pub chroma_entropy: f32,
    /// Weighted blend, clamped to [0, 1]
    pub score: f32,
    /// `score >= threshold`
    pub is_atonal: bool,
}

/// Shannon entropy of a chroma vector, normalized to [0, 1]
///
/// A silent vector has entropy 1.
pub fn normalized_entropy(chroma: &Chroma) -> f32 {
    let p = match normalize_sum(chroma) {
        Some(p) => p,
        None => return 1.0,
    };
    let h: f32 = p
        .iter()
        .filter(|&&x| x > 0.0)
        .map(|&x| -x * x.log2())
        .sum();
    (h / 12f32.log2()).clamp(0.0, 1.0)
}

fn chord_erraticness(chords: &[ChordEvent]) -> f32 {
    match chords.len() {
        0 => 1.0,
        1 => 0.0,
        n => {
            let changes = chords
                .windows(2)
                .filter(|pair| pair[0].label != pair[1].label)
                .count();
            changes as f32 / (n - 1) as f32
        }
    }
}

/// Compute the atonality score
///
/// # Arguments
///
/// * `key` - Key estimate, if any
/// * `chords` - Chord events in time order
/// * `chroma_frames` - Per-frame chroma
/// * `threshold` - Decision threshold for `is_atonal`
pub fn score_atonality(
    key: Option<&KeyEstimate>,
    chords: &[ChordEvent],
    chroma_frames: &[Chroma],
    threshold: f32,
) -> AtonalityReport {
    let key_instability = key.map_or(1.0, |k| 1.0 - k.confidence.clamp(0.0, 1.0));

    let chord_mismatch = if chords.is_empty() {
        1.0
    } else {
        let mean = chords.iter().map(|c| c.confidence).sum::<f32>() / chords.len() as f32;
        1.0 - mean.clamp(0.0, 1.0)
    };

    let chord_erraticness = chord_erraticness(chords);

    let chroma_entropy = if chroma_frames.is_empty() {
        1.0
    } else {
        chroma_frames.iter().map(normalized_entropy).sum::<f32>() / chroma_frames.len() as f32
    };

    let score = (KEY_WEIGHT * key_instability
        + CHORD_MISMATCH_WEIGHT * chord_mismatch
        + ERRATICNESS_WEIGHT * chord_erraticness
        + ENTROPY_WEIGHT * chroma_entropy)
        .clamp(0.0, 1.0);

    log::debug!(
        "Atonality: key={:.3} mismatch={:.3} erratic={:.3} entropy={:.3} -> {:.3}",
        key_instability,
        chord_mismatch,
        chord_erraticness,
        chroma_entropy,
        score
    );

    AtonalityReport {
        key_instability,
        chord_mismatch,
        chord_erraticness,
        chroma_entropy,
        score,
        is_atonal: score >= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::KeyMode;
    use crate::features::chords::ChordQuality;

    fn chord(root: u8, start: f32, confidence: f32) -> ChordEvent {
        ChordEvent {
            root_pitch_class: Some(root),
            quality: ChordQuality::Major,
            label: ChordQuality::Major.label(root),
            start_sec: start,
            duration_sec: 1.0,
            confidence,
        }
    }

    #[test]
    fn test_empty_input_is_fully_atonal() {
        let report = score_atonality(None, &[], &[], DEFAULT_ATONAL_THRESHOLD);
        assert!((report.score - 1.0).abs() < 1e-6, "score {}", report.score);
        assert!(report.is_atonal);
    }

    #[test]
    fn test_tonal_material_scores_low() {
        let key = KeyEstimate::new(0, KeyMode::Major, 0.9);
        let chords = vec![chord(0, 0.0, 0.9)];
        let mut c = [0.0; 12];
        c[0] = 1.0;
        c[7] = 0.5;
        let report = score_atonality(Some(&key), &chords, &vec![c; 8], DEFAULT_ATONAL_THRESHOLD);
        assert_eq!(report.chord_erraticness, 0.0);
        assert!(report.score < 0.3, "score {}", report.score);
        assert!(!report.is_atonal);
    }

    #[test]
    fn test_erraticness_counts_label_changes() {
        let chords = vec![
            chord(0, 0.0, 1.0),
            chord(0, 1.0, 1.0),
            chord(7, 2.0, 1.0),
            chord(5, 3.0, 1.0),
            chord(5, 4.0, 1.0),
        ];
        assert!((chord_erraticness(&chords) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_bounds() {
        assert!((normalized_entropy(&[1.0; 12]) - 1.0).abs() < 1e-5);
        let mut single = [0.0; 12];
        single[3] = 0.7;
        assert_eq!(normalized_entropy(&single), 0.0);
        assert_eq!(normalized_entropy(&[0.0; 12]), 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let score = score_atonality(None, &[], &[], DEFAULT_ATONAL_THRESHOLD).score;
        assert!(score_atonality(None, &[], &[], score).is_atonal);
        assert!(!score_atonality(None, &[], &[], score + 0.01).is_atonal);
    }
}
