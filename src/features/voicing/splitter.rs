//! Melody/harmony splitting by top-voice voting
//!
//! Time is cut into fixed-width frames. In every frame the highest sounding
//! note (ties: higher confidence) is the top voice. A note that is the top
//! voice in at least 55% of the frames it sounds in, and sits at or above
//! G3 (MIDI 55), is melody; everything else is harmony.

use serde::{Deserialize, Serialize};

use crate::analysis::result::NoteEvent;
use crate::error::AnalysisError;

/// Minimum share of a note's frames in which it must be the top voice
pub const MELODY_TOP_RATIO: f32 = 0.55;

/// Lowest MIDI pitch that can be melody (G3)
pub const MELODY_MIN_PITCH: u8 = 55;

/// Notes partitioned into melody and harmony
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MelodyHarmonySplit {
    /// Melody notes, in input order
    pub melody: Vec<NoteEvent>,
    /// Harmony notes, in input order
    pub harmony: Vec<NoteEvent>,
}

/// Per-note voting tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceTally {
    /// Frames in which the note was the top voice
    pub top_frames: usize,
    /// Frames in which the note was sounding
    pub active_frames: usize,
}

impl VoiceTally {
    /// `top_frames / active_frames`, or 0 for a note that never sounded
    pub fn top_ratio(&self) -> f32 {
        if self.active_frames == 0 {
            0.0
        } else {
            self.top_frames as f32 / self.active_frames as f32
        }
    }
}

/// Count top-voice and active frames for every note
///
/// # Errors
///
/// `InvalidInput` if `frame_ms` is not finite and positive.
pub fn tally_voices(notes: &[NoteEvent], frame_ms: f32) -> Result<Vec<VoiceTally>, AnalysisError> {
    if !frame_ms.is_finite() || frame_ms <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Voice frame width must be finite and > 0, got {} ms",
            frame_ms
        )));
    }

    let mut tallies = vec![VoiceTally::default(); notes.len()];
    let frame_sec = frame_ms / 1000.0;
    let total_end = notes.iter().map(|n| n.end_sec()).fold(0.0f32, f32::max);
    let n_frames = (total_end / frame_sec).ceil() as usize;

    for f in 0..n_frames {
        let t0 = f as f32 * frame_sec;
        let t1 = t0 + frame_sec;

        let mut top: Option<usize> = None;
        for (i, note) in notes.iter().enumerate() {
            if !(note.start_sec < t1 && note.end_sec() > t0) {
                continue;
            }
            tallies[i].active_frames += 1;
            top = match top {
                None => Some(i),
                Some(j) => {
                    let current = &notes[j];
                    let higher = note.pitch_midi > current.pitch_midi
                        || (note.pitch_midi == current.pitch_midi
                            && note.confidence > current.confidence);
                    if higher {
                        Some(i)
                    } else {
                        Some(j)
                    }
                }
            };
        }

        if let Some(i) = top {
            tallies[i].top_frames += 1;
        }
    }

    Ok(tallies)
}

/// Partition notes into melody and harmony
///
/// Each list is only populated when its flag is set. With both flags set,
/// every input note lands in exactly one list.
///
/// # Example
///
/// ```
/// use tonescribe::{split_melody_harmony, NoteEvent};
///
/// let note = |pitch, start| NoteEvent {
///     pitch_midi: pitch,
///     start_sec: start,
///     duration_sec: 0.5,
///     confidence: 0.8,
///     velocity: None,
/// };
/// let notes = vec![note(48, 0.0), note(72, 0.0)];
/// let split = split_melody_harmony(&notes, 30.0, true, true)?;
/// assert_eq!(split.melody[0].pitch_midi, 72);
/// assert_eq!(split.harmony[0].pitch_midi, 48);
/// # Ok::<(), tonescribe::AnalysisError>(())
/// ```
pub fn split_melody_harmony(
    notes: &[NoteEvent],
    frame_ms: f32,
    extract_melody: bool,
    extract_harmony: bool,
) -> Result<MelodyHarmonySplit, AnalysisError> {
    let tallies = tally_voices(notes, frame_ms)?;
    let mut split = MelodyHarmonySplit::default();

    for (note, tally) in notes.iter().zip(&tallies) {
        let is_melody =
            tally.top_ratio() >= MELODY_TOP_RATIO && note.pitch_midi >= MELODY_MIN_PITCH;
        if is_melody {
            if extract_melody {
                split.melody.push(note.clone());
            }
        } else if extract_harmony {
            split.harmony.push(note.clone());
        }
    }

    log::debug!(
        "Voice split: {} notes -> {} melody, {} harmony",
        notes.len(),
        split.melody.len(),
        split.harmony.len()
    );

    Ok(split)
}
