//! Chord template scoring
//!
//! For a sum-normalized chroma vector `p`:
//!
//! ```text
//! score      = sum(p[chord tones]) - 0.35 * sum(p[other tones])
//! confidence = clamp((best - second) / 0.2 + max(0, best), 0, 1)
//! ```

use serde::{Deserialize, Serialize};

use super::templates::{all_templates, ChordQuality, ChordTemplate};
use crate::features::chroma::normalization::normalize_sum;
use crate::features::chroma::Chroma;

/// Weight of energy outside the chord
pub const NON_CHORD_TONE_PENALTY: f32 = 0.35;

/// Best/second-best margin that maps to full confidence
pub const CONFIDENCE_MARGIN_SCALE: f32 = 0.2;

/// Winning template for one chroma vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordScore {
    /// Root pitch class
    pub root: u8,
    /// Quality
    pub quality: ChordQuality,
    /// Best template score
    pub best_score: f32,
    /// Runner-up template score
    pub second_score: f32,
    /// Confidence (0.0-1.0)
    pub confidence: f32,
}

impl ChordScore {
    /// Chord symbol
    pub fn label(&self) -> String {
        self.quality.label(self.root)
    }
}

/// Score a template against a sum-normalized chroma vector
pub fn template_score(template: &ChordTemplate, normalized: &Chroma) -> f32 {
    let mut inside = 0.0f32;
    let mut outside = 0.0f32;
    for (pc, &energy) in normalized.iter().enumerate() {
        if template.mask[pc] {
            inside += energy;
        } else {
            outside += energy;
        }
    }
    inside - NON_CHORD_TONE_PENALTY * outside
}

/// Confidence from the best and runner-up scores
pub fn chord_confidence(best: f32, second: f32) -> f32 {
    ((best - second) / CONFIDENCE_MARGIN_SCALE + best.max(0.0)).clamp(0.0, 1.0)
}

/// Reusable scorer holding the 120 templates
#[derive(Debug, Clone)]
pub struct ChordScorer {
    templates: Vec<ChordTemplate>,
}

impl Default for ChordScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordScorer {
    /// Build the template bank
    pub fn new() -> Self {
        Self {
            templates: all_templates(),
        }
    }

    /// Score a chroma vector against every template
    ///
    /// Returns `None` for a vector with no positive energy. Ties keep the
    /// earlier template (C before C#, major before minor).
    pub fn score(&self, chroma: &Chroma) -> Option<ChordScore> {
        let normalized = normalize_sum(chroma)?;

        let mut best: Option<(&ChordTemplate, f32)> = None;
        let mut second = f32::NEG_INFINITY;
        for template in &self.templates {
            let score = template_score(template, &normalized);
            match best {
                Some((_, best_score)) if score <= best_score => {
                    if score > second {
                        second = score;
                    }
                }
                Some((_, best_score)) => {
                    second = best_score;
                    best = Some((template, score));
                }
                None => best = Some((template, score)),
            }
        }

        let (template, best_score) = best?;
        Some(ChordScore {
            root: template.root,
            quality: template.quality,
            best_score,
            second_score: second,
            confidence: chord_confidence(best_score, second),
        })
    }
}

/// Score one chroma vector with a fresh template bank
pub fn score_chroma(chroma: &Chroma) -> Option<ChordScore> {
    ChordScorer::new().score(chroma)
}
