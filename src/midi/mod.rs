//! Standard MIDI File export
//!
//! Writes a Type-1 file: a tempo track, then an optional chord track and an
//! optional melody track. Delta times are VLQ-encoded and running status is
//! never used, so identical input always produces identical bytes.

pub mod vlq;
pub mod writer;

pub use vlq::{write_vlq, MAX_VLQ};
pub use writer::{chord_velocity, encode_midi, melody_velocity, seconds_to_ticks};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// MIDI export options
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiExportOptions {
    /// Tempo in beats per minute (default: 120)
    pub tempo_bpm: f32,

    /// Ticks per quarter note (default: 480)
    pub ppq: u16,

    /// Octave of chord roots; root MIDI note is `octave * 12 + pitch class` (default: 4)
    pub chord_base_octave: u8,

    /// Write the chord track (default: true)
    pub include_chords: bool,

    /// Write the melody track (default: true)
    pub include_melody: bool,

    /// MIDI channel for chords, 0-15 (default: 0)
    pub chord_channel: u8,

    /// MIDI channel for melody, 0-15 (default: 1)
    pub melody_channel: u8,
}

impl Default for MidiExportOptions {
    fn default() -> Self {
        Self {
            tempo_bpm: 120.0,
            ppq: 480,
            chord_base_octave: 4,
            include_chords: true,
            include_melody: true,
            chord_channel: 0,
            melody_channel: 1,
        }
    }
}

impl MidiExportOptions {
    /// Check that every option can be represented in a MIDI file
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.tempo_bpm.is_finite() || self.tempo_bpm <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Tempo must be finite and > 0, got {}",
                self.tempo_bpm
            )));
        }
        if self.ppq == 0 || self.ppq > 0x7FFF {
            return Err(AnalysisError::InvalidInput(format!(
                "Ticks per quarter must be in 1..=32767, got {}",
                self.ppq
            )));
        }
        if self.chord_base_octave > 10 {
            return Err(AnalysisError::InvalidInput(format!(
                "Chord base octave must be <= 10, got {}",
                self.chord_base_octave
            )));
        }
        for (name, channel) in [
            ("chord_channel", self.chord_channel),
            ("melody_channel", self.melody_channel),
        ] {
            if channel > 15 {
                return Err(AnalysisError::InvalidInput(format!(
                    "{} must be 0-15, got {}",
                    name, channel
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MidiExportOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            MidiExportOptions { tempo_bpm: 0.0, ..Default::default() },
            MidiExportOptions { tempo_bpm: f32::NAN, ..Default::default() },
            MidiExportOptions { ppq: 0, ..Default::default() },
            MidiExportOptions { ppq: 0x8000, ..Default::default() },
            MidiExportOptions { melody_channel: 16, ..Default::default() },
            MidiExportOptions { chord_base_octave: 11, ..Default::default() },
        ];
        for options in bad {
            assert!(options.validate().is_err(), "{:?} should be rejected", options);
        }
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let options: MidiExportOptions =
            serde_json::from_str(r#"{ "tempo_bpm": 90.0, "include_chords": false }"#).unwrap();
        assert_eq!(options.tempo_bpm, 90.0);
        assert!(!options.include_chords);
        assert_eq!(options.ppq, 480);
        assert_eq!(options.melody_channel, 1);
    }
}
