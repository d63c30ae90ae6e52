//! Chord templates
//!
//! Ten qualities over twelve roots give 120 candidate chords. Each quality
//! maps to its interval set through an exhaustive `match`.

use serde::{Deserialize, Serialize};

use crate::features::chroma::pitch_class_name;

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    /// Major triad
    Major,
    /// Minor triad
    Minor,
    /// Diminished triad
    Diminished,
    /// Augmented triad
    Augmented,
    /// Suspended second
    Sus2,
    /// Suspended fourth
    Sus4,
    /// Dominant seventh
    Dominant7,
    /// Major seventh
    Major7,
    /// Minor seventh
    Minor7,
    /// Half-diminished seventh (m7b5)
    HalfDiminished7,
}

impl ChordQuality {
    /// All qualities, in scoring order
    pub const ALL: [ChordQuality; 10] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::HalfDiminished7,
    ];

    /// Semitone intervals above the root
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
        }
    }

    /// Suffix for chord symbol display
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished7 => "m7b5",
        }
    }

    /// Full chord symbol for a root, e.g. "F#m7"
    pub fn label(&self, root_pitch_class: u8) -> String {
        format!("{}{}", pitch_class_name(root_pitch_class), self.suffix())
    }
}

/// One root/quality combination with its pitch-class membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTemplate {
    /// Root pitch class (0-11)
    pub root: u8,
    /// Quality
    pub quality: ChordQuality,
    /// `mask[pc]` is true for chord tones
    pub mask: [bool; 12],
}

impl ChordTemplate {
    /// Template for a root and quality
    pub fn new(root: u8, quality: ChordQuality) -> Self {
        let root = root % 12;
        let mut mask = [false; 12];
        for &interval in quality.intervals() {
            mask[((root + interval) % 12) as usize] = true;
        }
        Self {
            root,
            quality,
            mask,
        }
    }

    /// Chord symbol
    pub fn label(&self) -> String {
        self.quality.label(self.root)
    }
}

/// All 120 templates, roots outermost (C first), qualities in [`ChordQuality::ALL`] order
pub fn all_templates() -> Vec<ChordTemplate> {
    (0..12u8)
        .flat_map(|root| {
            ChordQuality::ALL
                .iter()
                .map(move |&quality| ChordTemplate::new(root, quality))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_count() {
        let templates = all_templates();
        assert_eq!(templates.len(), 120);
        assert_eq!(templates[0].label(), "C");
        assert_eq!(templates[119].label(), "Bm7b5");
    }

    #[test]
    fn test_masks() {
        let g7 = ChordTemplate::new(7, ChordQuality::Dominant7);
        let tones: Vec<usize> = (0..12).filter(|&pc| g7.mask[pc]).collect();
        assert_eq!(tones, vec![2, 5, 7, 11]);

        let a_min = ChordTemplate::new(9, ChordQuality::Minor);
        let tones: Vec<usize> = (0..12).filter(|&pc| a_min.mask[pc]).collect();
        assert_eq!(tones, vec![0, 4, 9]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ChordQuality::Minor.label(6), "F#m");
        assert_eq!(ChordQuality::Major7.label(5), "Fmaj7");
        assert_eq!(ChordQuality::Sus4.label(2), "Dsus4");
        assert_eq!(ChordQuality::HalfDiminished7.label(11), "Bm7b5");
    }

    #[test]
    fn test_every_quality_contains_root() {
        for quality in ChordQuality::ALL {
            assert_eq!(quality.intervals()[0], 0, "{:?}", quality);
        }
    }
}
