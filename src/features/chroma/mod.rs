//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Pitch projection (chroma + per-semitone energy)
//! - Normalization strategies
//! - Temporal smoothing

pub mod extractor;
pub mod normalization;
pub mod smoothing;

pub use extractor::{project_spectrogram, PitchProjection};
pub use smoothing::ChromaSmoother;

/// 12-bin energy vector over pitch classes (index 0 = C)
pub type Chroma = [f32; 12];

/// Pitch class names, sharps only
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch class (taken modulo 12)
pub fn pitch_class_name(pitch_class: u8) -> &'static str {
    PITCH_CLASS_NAMES[(pitch_class % 12) as usize]
}
