//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::features::chords::ChordQuality;
use crate::features::chroma::{pitch_class_name, Chroma};
use crate::midi::{encode_midi, MidiExportOptions};

/// A transcribed note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI note number (0-127)
    pub pitch_midi: u8,
    /// Onset in seconds
    pub start_sec: f32,
    /// Duration in seconds
    pub duration_sec: f32,
    /// Mean relative energy across the note's frames (0.0-1.0)
    pub confidence: f32,
    /// MIDI velocity (1-127), if known
    pub velocity: Option<u8>,
}

impl NoteEvent {
    /// Offset in seconds
    pub fn end_sec(&self) -> f32 {
        self.start_sec + self.duration_sec
    }
}

/// A chord spanning a stretch of time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Root pitch class (0 = C ... 11 = B)
    pub root_pitch_class: Option<u8>,
    /// Chord quality
    pub quality: ChordQuality,
    /// Display label, e.g. "C", "F#m", "Bm7b5"
    pub label: String,
    /// Start in seconds
    pub start_sec: f32,
    /// Duration in seconds
    pub duration_sec: f32,
    /// Confidence (0.0-1.0), the maximum over the merged windows
    pub confidence: f32,
}

impl ChordEvent {
    /// End in seconds
    pub fn end_sec(&self) -> f32 {
        self.start_sec + self.duration_sec
    }
}

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

impl std::fmt::Display for KeyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMode::Major => write!(f, "major"),
            KeyMode::Minor => write!(f, "minor"),
        }
    }
}

/// Estimated key of the whole buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Tonic pitch class (0 = C ... 11 = B)
    pub tonic_pitch_class: u8,
    /// Major or minor
    pub mode: KeyMode,
    /// Confidence (0.0-1.0)
    pub confidence: f32,
    /// Display label, e.g. "C major", "F# minor"
    pub label: String,
}

impl KeyEstimate {
    /// Build an estimate with its label derived from tonic and mode
    pub fn new(tonic_pitch_class: u8, mode: KeyMode, confidence: f32) -> Self {
        let tonic = tonic_pitch_class % 12;
        Self {
            tonic_pitch_class: tonic,
            mode,
            confidence,
            label: format!("{} {}", pitch_class_name(tonic), mode),
        }
    }

    /// Short key name in musical notation (e.g., "C", "Am", "F#m")
    ///
    /// # Example
    ///
    /// ```
    /// use tonescribe::{KeyEstimate, KeyMode};
    ///
    /// assert_eq!(KeyEstimate::new(0, KeyMode::Major, 1.0).short_name(), "C");
    /// assert_eq!(KeyEstimate::new(9, KeyMode::Minor, 1.0).short_name(), "Am");
    /// ```
    pub fn short_name(&self) -> String {
        let name = pitch_class_name(self.tonic_pitch_class);
        match self.mode {
            KeyMode::Major => name.to_string(),
            KeyMode::Minor => format!("{}m", name),
        }
    }
}

/// Scores for one chord window (diagnostics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordWindowScore {
    /// Window start in seconds
    pub start_sec: f32,
    /// Window end in seconds
    pub end_sec: f32,
    /// Best-scoring label before stabilization
    pub best_label: String,
    /// Best template score
    pub best_score: f32,
    /// Runner-up template score
    pub second_score: f32,
    /// Confidence of the best label
    pub confidence: f32,
    /// Label after hysteresis
    pub stabilized_label: String,
    /// True if the previous window's label was carried forward
    pub carried_forward: bool,
}

/// Diagnostic payload, attached when `include_debug` is set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisDebug {
    /// Frame start times in seconds
    pub frame_times: Vec<f32>,
    /// Chroma per frame before smoothing
    pub raw_chroma: Vec<Chroma>,
    /// Per-window chord scores
    pub chord_windows: Vec<ChordWindowScore>,
    /// Warnings raised during analysis
    pub warnings: Vec<String>,
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: f32,

    /// Number of analysis frames
    pub frame_count: usize,

    /// Hop between frames in samples
    pub hop_size: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Warnings (placeholders used, silent input, ...)
    pub warnings: Vec<String>,
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All tracked notes, sorted by start time then pitch
    pub notes: Vec<NoteEvent>,

    /// Notes classified as melody (empty unless `extract_melody`)
    pub melody: Vec<NoteEvent>,

    /// Notes classified as harmony (empty unless `extract_harmony`)
    pub harmony: Vec<NoteEvent>,

    /// Chord progression (empty unless `infer_chords`)
    pub chords: Vec<ChordEvent>,

    /// Key estimate, absent for empty or silent input
    pub key: Option<KeyEstimate>,

    /// Atonality score (0.0-1.0); 0.0 when `detect_atonal` is off
    pub atonal_score: f32,

    /// `atonal_score >= atonal_threshold`
    pub is_atonal: bool,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,

    /// Diagnostics, present when `include_debug` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AnalysisDebug>,
}

impl AnalysisResult {
    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Encode the melody and chord progression as a Standard MIDI File
    pub fn to_midi(&self, options: &MidiExportOptions) -> Result<Vec<u8>, AnalysisError> {
        encode_midi(&self.melody, &self.chords, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_labels() {
        let key = KeyEstimate::new(6, KeyMode::Minor, 0.5);
        assert_eq!(key.label, "F# minor");
        assert_eq!(key.short_name(), "F#m");

        let key = KeyEstimate::new(12, KeyMode::Major, 0.5);
        assert_eq!(key.tonic_pitch_class, 0);
        assert_eq!(key.label, "C major");
    }

    #[test]
    fn test_event_end() {
        let note = NoteEvent {
            pitch_midi: 60,
            start_sec: 1.0,
            duration_sec: 0.5,
            confidence: 1.0,
            velocity: None,
        };
        assert_eq!(note.end_sec(), 1.5);
    }

    #[test]
    fn test_key_mode_serializes_snake_case() {
        let json = serde_json::to_string(&KeyMode::Minor).unwrap();
        assert_eq!(json, "\"minor\"");
    }
}
