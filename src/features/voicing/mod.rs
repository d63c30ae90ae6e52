//! Voice splitting
//!
//! Separates tracked notes into a melody line and accompanying harmony.

pub mod splitter;

pub use splitter::{split_melody_harmony, tally_voices, MelodyHarmonySplit, VoiceTally};
