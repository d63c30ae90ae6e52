//! Configuration parameters for transcription
//!
//! `AnalysisOptions` is a plain value merged over documented defaults. With
//! `#[serde(default)]`, a partial JSON document only overrides the fields it
//! names:
//!
//! ```
//! use tonescribe::AnalysisOptions;
//!
//! let options: AnalysisOptions =
//!     serde_json::from_str(r#"{ "do_hpss": true, "time_resolution_ms": 20.0 }"#).unwrap();
//! assert!(options.do_hpss);
//! assert!(options.extract_melody);
//! assert_eq!(options.min_note_duration_ms, 80.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::atonality::DEFAULT_ATONAL_THRESHOLD;
use crate::error::AnalysisError;
use crate::features::chords::inference::{DEFAULT_HOP_MS, DEFAULT_WINDOW_MS};
use crate::features::spectral::DEFAULT_FRAME_SIZE;
use crate::preprocessing::normalization::DEFAULT_TARGET_PEAK;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    // Preprocessing
    /// Request harmonic/percussive separation (default: false)
    ///
    /// Separation is a placeholder: the normalized signal is passed through as
    /// the harmonic part and a warning is recorded.
    pub do_hpss: bool,

    /// Peak level after normalization (default: 0.98)
    pub target_peak: f32,

    // Outputs
    /// Populate the melody list (default: true)
    pub extract_melody: bool,

    /// Populate the harmony list (default: true)
    pub extract_harmony: bool,

    /// Run chord inference (default: true)
    pub infer_chords: bool,

    /// Compute the atonality score (default: true)
    pub detect_atonal: bool,

    // Timing
    /// Analysis hop and voice-splitting frame width in milliseconds (default: 30)
    pub time_resolution_ms: f32,

    /// Shortest note the tracker will emit, in milliseconds (default: 80)
    pub min_note_duration_ms: f32,

    /// FFT frame size in samples, must be a power of two (default: 2048)
    pub frame_size: usize,

    // Chords
    /// Chord window length in milliseconds (default: 500)
    pub chord_window_ms: f32,

    /// Chord window advance in milliseconds (default: 250)
    pub chord_hop_ms: f32,

    /// Exponential chroma smoothing factor in [0, 1) (default: 0.0 = off)
    /// Higher values weight earlier frames more heavily
    pub chroma_smoothing: f32,

    // Atonality
    /// Score at or above which a buffer is reported atonal (default: 0.65)
    pub atonal_threshold: f32,

    /// Attach frame timestamps, raw chroma and per-window chord scores (default: false)
    pub include_debug: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            do_hpss: false,
            target_peak: DEFAULT_TARGET_PEAK,
            extract_melody: true,
            extract_harmony: true,
            infer_chords: true,
            detect_atonal: true,
            time_resolution_ms: 30.0,
            min_note_duration_ms: 80.0,
            frame_size: DEFAULT_FRAME_SIZE,
            chord_window_ms: DEFAULT_WINDOW_MS,
            chord_hop_ms: DEFAULT_HOP_MS,
            chroma_smoothing: 0.0,
            atonal_threshold: DEFAULT_ATONAL_THRESHOLD,
            include_debug: false,
        }
    }
}

impl AnalysisOptions {
    /// Check every numeric control before any work is done
    pub fn validate(&self) -> Result<(), AnalysisError> {
        check_positive("time_resolution_ms", self.time_resolution_ms)?;
        check_positive("chord_window_ms", self.chord_window_ms)?;
        check_positive("chord_hop_ms", self.chord_hop_ms)?;
        check_positive("target_peak", self.target_peak)?;

        if !self.min_note_duration_ms.is_finite() || self.min_note_duration_ms < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "min_note_duration_ms must be finite and >= 0, got {}",
                self.min_note_duration_ms
            )));
        }

        if !self.atonal_threshold.is_finite() {
            return Err(AnalysisError::InvalidInput(
                "atonal_threshold must be finite".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.chroma_smoothing) {
            return Err(AnalysisError::InvalidInput(format!(
                "chroma_smoothing must be in [0, 1), got {}",
                self.chroma_smoothing
            )));
        }

        if self.frame_size < 2 || !self.frame_size.is_power_of_two() {
            return Err(AnalysisError::InvalidInput(format!(
                "frame_size must be a power of two >= 2, got {}",
                self.frame_size
            )));
        }

        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), AnalysisError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )));
    }
    Ok(())
}
