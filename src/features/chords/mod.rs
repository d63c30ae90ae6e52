//! Chord inference
//!
//! - 120 chord templates (10 qualities x 12 roots)
//! - Template scoring with a non-chord-tone penalty
//! - Sliding-window inference with hysteresis and run merging

pub mod inference;
pub mod scoring;
pub mod templates;

pub use inference::{infer_chords, ChordInference};
pub use scoring::{score_chroma, ChordScore, ChordScorer};
pub use templates::{ChordQuality, ChordTemplate};
