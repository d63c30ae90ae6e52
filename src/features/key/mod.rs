//! Key estimation
//!
//! Krumhansl-Schmuckler correlation over 24 candidate keys.

pub mod detector;
pub mod templates;

pub use detector::{estimate_key, key_candidates, key_confidence, pearson, KeyCandidate};
