//! Feature extraction modules
//!
//! This module contains the frame-level analysis stages:
//! - Spectral analysis (FFT, window, STFT)
//! - Chroma and per-semitone energy
//! - Note tracking
//! - Melody/harmony splitting
//! - Chord inference
//! - Key estimation

pub mod chords;
pub mod chroma;
pub mod key;
pub mod notes;
pub mod spectral;
pub mod voicing;
