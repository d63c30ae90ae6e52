//! Onset/offset note tracking
//!
//! Each frame activates every semitone whose energy reaches 45% of the
//! frame's strongest semitone. A semitone moves through three states:
//!
//! - inactive -> active on the first frame at/above threshold (start time recorded)
//! - active -> active while it stays above threshold (duration and confidence accumulate)
//! - active -> finalized on the first frame below threshold, or at the end of input
//!
//! A frame with no energy at all activates nothing and leaves sounding notes
//! untouched.
//!
//! Finalized notes shorter than the minimum duration are discarded.

use std::collections::BTreeMap;

use crate::analysis::result::NoteEvent;

/// Fraction of the frame peak a semitone must reach to be active
pub const ACTIVATION_RATIO: f32 = 0.45;

/// Slack for comparing accumulated float durations against the minimum, in ms
const DURATION_EPSILON_MS: f32 = 1e-3;

#[derive(Debug, Clone)]
struct ActiveNote {
    start_sec: f32,
    frames: usize,
    confidence_sum: f32,
}

/// Frame-by-frame note state machine
///
/// Built fresh for every buffer; it holds no state beyond the notes it is
/// currently tracking.
#[derive(Debug, Clone)]
pub struct NoteTracker {
    hop_seconds: f32,
    min_duration_ms: f32,
    active: BTreeMap<u8, ActiveNote>,
    finished: Vec<NoteEvent>,
}

impl NoteTracker {
    /// Create a tracker for frames spaced `hop_seconds` apart
    pub fn new(hop_seconds: f32, min_note_duration_ms: f32) -> Self {
        Self {
            hop_seconds,
            min_duration_ms: min_note_duration_ms,
            active: BTreeMap::new(),
            finished: Vec::new(),
        }
    }

    /// Advance by one frame of per-semitone energy
    pub fn push_frame(&mut self, time_sec: f32, energies: &[f32]) {
        let frame_peak = energies.iter().copied().fold(0.0f32, f32::max);
        // A silent frame leaves every sounding note as it is
        if frame_peak <= 0.0 {
            return;
        }
        let threshold = ACTIVATION_RATIO * frame_peak;

        let mut on = [false; 128];
        for (midi, &energy) in energies.iter().enumerate().take(128) {
            if energy >= threshold {
                on[midi] = true;
                let confidence = (energy / frame_peak).clamp(0.0, 1.0);
                let note = self.active.entry(midi as u8).or_insert(ActiveNote {
                    start_sec: time_sec,
                    frames: 0,
                    confidence_sum: 0.0,
                });
                note.frames += 1;
                note.confidence_sum += confidence;
            }
        }

        let released: Vec<u8> = self
            .active
            .keys()
            .copied()
            .filter(|&midi| !on[midi as usize])
            .collect();
        for midi in released {
            if let Some(note) = self.active.remove(&midi) {
                self.finalize(midi, note);
            }
        }
    }

    /// Close every still-sounding note and return all emitted notes,
    /// sorted by start time, then pitch
    pub fn finish(mut self) -> Vec<NoteEvent> {
        let remaining = std::mem::take(&mut self.active);
        for (midi, note) in remaining {
            self.finalize(midi, note);
        }
        let mut notes = self.finished;
        notes.sort_by(|a, b| {
            a.start_sec
                .total_cmp(&b.start_sec)
                .then(a.pitch_midi.cmp(&b.pitch_midi))
        });
        notes
    }

    fn finalize(&mut self, midi: u8, note: ActiveNote) {
        let duration_sec = note.frames as f32 * self.hop_seconds;
        if duration_sec * 1000.0 + DURATION_EPSILON_MS < self.min_duration_ms {
            return;
        }
        let confidence = (note.confidence_sum / note.frames as f32).clamp(0.0, 1.0);
        self.finished.push(NoteEvent {
            pitch_midi: midi,
            start_sec: note.start_sec,
            duration_sec,
            confidence,
            velocity: Some((50.0 + 70.0 * confidence).round() as u8),
        });
    }
}

/// Track notes over a whole sequence of per-semitone energy frames
///
/// # Arguments
///
/// * `semitone_energy` - One 128-slot energy vector per frame
/// * `times` - Frame start times in seconds
/// * `hop_seconds` - Time between frames (each active frame adds this much duration)
/// * `min_note_duration_ms` - Shortest note to emit
pub fn track_notes(
    semitone_energy: &[Vec<f32>],
    times: &[f32],
    hop_seconds: f32,
    min_note_duration_ms: f32,
) -> Vec<NoteEvent> {
    let mut tracker = NoteTracker::new(hop_seconds, min_note_duration_ms);
    for (energies, &time) in semitone_energy.iter().zip(times) {
        tracker.push_frame(time, energies);
    }
    let notes = tracker.finish();
    log::debug!(
        "Tracked {} notes over {} frames",
        notes.len(),
        semitone_energy.len()
    );
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(entries: &[(usize, f32)]) -> Vec<f32> {
        let mut f = vec![0.0f32; 128];
        for &(midi, e) in entries {
            f[midi] = e;
        }
        f
    }

    fn times(n: usize, hop: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * hop).collect()
    }

    #[test]
    fn test_single_sustained_note() {
        let frames: Vec<Vec<f32>> = (0..5).map(|_| frame(&[(60, 1.0)])).collect();
        let notes = track_notes(&frames, &times(5, 0.03), 0.03, 80.0);

        assert_eq!(notes.len(), 1);
        let note = &notes[0];
        assert_eq!(note.pitch_midi, 60);
        assert_eq!(note.start_sec, 0.0);
        assert!((note.duration_sec - 0.15).abs() < 1e-6);
        assert_eq!(note.confidence, 1.0);
        assert_eq!(note.velocity, Some(120));
    }

    #[test]
    fn test_short_note_discarded() {
        let frames = vec![frame(&[(60, 1.0)]), frame(&[(60, 1.0)]), frame(&[])];
        let notes = track_notes(&frames, &times(3, 0.03), 0.03, 80.0);
        assert!(notes.is_empty(), "60 ms note should be dropped: {:?}", notes);
    }

    #[test]
    fn test_threshold_is_relative_to_frame_peak() {
        // 64 sits at 40% of the peak (inactive), 67 at 50% (active)
        let frames: Vec<Vec<f32>> = (0..4)
            .map(|_| frame(&[(60, 1.0), (64, 0.4), (67, 0.5)]))
            .collect();
        let notes = track_notes(&frames, &times(4, 0.03), 0.03, 80.0);

        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch_midi).collect();
        assert_eq!(pitches, vec![60, 67]);
        let g = &notes[1];
        assert!((g.confidence - 0.5).abs() < 1e-6);
        assert_eq!(g.velocity, Some(85));
    }

    #[test]
    fn test_offset_then_new_onset() {
        let mut frames = Vec::new();
        for _ in 0..3 {
            frames.push(frame(&[(60, 1.0)]));
        }
        for _ in 0..3 {
            frames.push(frame(&[(62, 1.0)]));
        }
        for _ in 0..3 {
            frames.push(frame(&[(60, 1.0)]));
        }
        let notes = track_notes(&frames, &times(9, 0.03), 0.03, 80.0);

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].pitch_midi, 60);
        assert_eq!(notes[1].pitch_midi, 62);
        assert_eq!(notes[2].pitch_midi, 60);
        assert!((notes[1].start_sec - 0.09).abs() < 1e-6);
        assert!((notes[2].start_sec - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_silent_frame_keeps_notes_open() {
        let mut frames: Vec<Vec<f32>> = (0..4).map(|_| frame(&[(72, 2.0)])).collect();
        frames.push(frame(&[]));
        frames.extend((0..4).map(|_| frame(&[(72, 2.0)])));
        let notes = track_notes(&frames, &times(9, 0.03), 0.03, 80.0);

        assert_eq!(notes.len(), 1, "a silent frame must not split the note: {:?}", notes);
        let note = &notes[0];
        assert_eq!(note.pitch_midi, 72);
        assert_eq!(note.start_sec, 0.0);
        // The silent frame adds no duration
        assert!(
            (note.duration_sec - 0.24).abs() < 1e-6,
            "duration {:.4}",
            note.duration_sec
        );
    }

    #[test]
    fn test_mean_confidence() {
        let frames = vec![
            frame(&[(60, 1.0), (48, 1.0)]),
            frame(&[(60, 0.5), (48, 1.0)]),
            frame(&[(60, 1.0), (48, 1.0)]),
        ];
        let notes = track_notes(&frames, &times(3, 0.05), 0.05, 80.0);
        let c = notes.iter().find(|n| n.pitch_midi == 60).unwrap();
        assert!((c.confidence - (2.5 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_sorted_by_start_then_pitch() {
        let frames = vec![
            frame(&[(67, 1.0)]),
            frame(&[(67, 1.0), (60, 1.0), (64, 1.0)]),
            frame(&[(67, 1.0), (60, 1.0), (64, 1.0)]),
            frame(&[(60, 1.0), (64, 1.0)]),
        ];
        let notes = track_notes(&frames, &times(4, 0.05), 0.05, 80.0);
        let order: Vec<(u8, f32)> = notes.iter().map(|n| (n.pitch_midi, n.start_sec)).collect();
        assert_eq!(order, vec![(67, 0.0), (60, 0.05), (64, 0.05)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(track_notes(&[], &[], 0.03, 80.0).is_empty());
    }
}
