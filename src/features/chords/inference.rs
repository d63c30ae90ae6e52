//! Sliding-window chord inference
//!
//! Chroma frames are averaged over windows of `window_ms`, advanced by
//! `hop_ms`. Each window is scored against the template bank. A window whose
//! confidence falls below [`HYSTERESIS_CONFIDENCE`] inherits the previous
//! window's chord, and consecutive windows with the same chord merge into one
//! [`ChordEvent`].

use super::scoring::ChordScorer;
use super::templates::ChordQuality;
use crate::analysis::result::{ChordEvent, ChordWindowScore};
use crate::error::AnalysisError;
use crate::features::chroma::Chroma;

/// Below this confidence the previous window's chord is kept
pub const HYSTERESIS_CONFIDENCE: f32 = 0.45;

/// Default window length in milliseconds
pub const DEFAULT_WINDOW_MS: f32 = 500.0;

/// Default window advance in milliseconds
pub const DEFAULT_HOP_MS: f32 = 250.0;

/// Inferred progression plus per-window diagnostics
#[derive(Debug, Clone, Default)]
pub struct ChordInference {
    /// Merged chord events, in time order
    pub chords: Vec<ChordEvent>,
    /// One entry per scored (non-empty, non-silent) window
    pub windows: Vec<ChordWindowScore>,
}

// A run of windows sharing one stabilized chord
struct Run {
    root: u8,
    quality: ChordQuality,
    start: f32,
    end: f32,
    confidence: f32,
}

impl Run {
    fn into_event(self) -> ChordEvent {
        ChordEvent {
            root_pitch_class: Some(self.root),
            quality: self.quality,
            label: self.quality.label(self.root),
            start_sec: self.start,
            duration_sec: (self.end - self.start).max(0.0),
            confidence: self.confidence,
        }
    }
}

/// Infer a chord progression from time-stamped chroma frames
///
/// # Arguments
///
/// * `chroma` - Chroma frames
/// * `times` - Start time of each frame in seconds (non-decreasing)
/// * `window_ms` - Window length in milliseconds
/// * `hop_ms` - Window advance in milliseconds
///
/// # Returns
///
/// Merged chord events and the per-window scores. Empty input gives an empty
/// result. Windows containing no frames, or only silent frames, are skipped.
///
/// # Errors
///
/// `InvalidInput` if the frame and time counts differ, or if the window or
/// hop is not finite and positive.
pub fn infer_chords(
    chroma: &[Chroma],
    times: &[f32],
    window_ms: f32,
    hop_ms: f32,
) -> Result<ChordInference, AnalysisError> {
    if chroma.len() != times.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma frame count ({}) does not match timestamp count ({})",
            chroma.len(),
            times.len()
        )));
    }
    for (name, value) in [("window_ms", window_ms), ("hop_ms", hop_ms)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Chord {} must be finite and > 0, got {}",
                name, value
            )));
        }
    }

    let mut inference = ChordInference::default();
    let last_time = match times.last() {
        Some(&t) => t,
        None => return Ok(inference),
    };

    let window_sec = window_ms / 1000.0;
    let hop_sec = hop_ms / 1000.0;
    let scorer = ChordScorer::new();

    let mut previous: Option<(u8, ChordQuality)> = None;
    let mut run: Option<Run> = None;

    let mut k = 0usize;
    loop {
        let start = k as f32 * hop_sec;
        if start > last_time {
            break;
        }
        k += 1;
        let end = start + window_sec;

        let lo = times.partition_point(|&t| t < start);
        let hi = times.partition_point(|&t| t < end);
        if hi <= lo {
            continue;
        }

        let mut mean = [0.0f32; 12];
        for frame in &chroma[lo..hi] {
            for (acc, &v) in mean.iter_mut().zip(frame.iter()) {
                *acc += v;
            }
        }
        let count = (hi - lo) as f32;
        for v in mean.iter_mut() {
            *v /= count;
        }

        let score = match scorer.score(&mean) {
            Some(score) => score,
            None => continue,
        };

        let (root, quality, carried_forward) = match previous {
            Some((prev_root, prev_quality)) if score.confidence < HYSTERESIS_CONFIDENCE => {
                (prev_root, prev_quality, true)
            }
            _ => (score.root, score.quality, false),
        };
        previous = Some((root, quality));

        inference.windows.push(ChordWindowScore {
            start_sec: start,
            end_sec: end,
            best_label: score.label(),
            best_score: score.best_score,
            second_score: score.second_score,
            confidence: score.confidence,
            stabilized_label: quality.label(root),
            carried_forward,
        });

        run = match run.take() {
            Some(mut current) if current.root == root && current.quality == quality => {
                current.end = end;
                current.confidence = current.confidence.max(score.confidence);
                Some(current)
            }
            Some(mut current) => {
                current.end = current.end.min(start);
                inference.chords.push(current.into_event());
                Some(Run {
                    root,
                    quality,
                    start,
                    end,
                    confidence: score.confidence,
                })
            }
            None => Some(Run {
                root,
                quality,
                start,
                end,
                confidence: score.confidence,
            }),
        };
    }

    if let Some(current) = run {
        inference.chords.push(current.into_event());
    }

    log::debug!(
        "Chord inference: {} frames, {} scored windows, {} chord events",
        chroma.len(),
        inference.windows.len(),
        inference.chords.len()
    );

    Ok(inference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triad(root: usize, third: usize, fifth: usize) -> Chroma {
        let mut c = [0.0; 12];
        c[root % 12] = 1.0;
        c[(root + third) % 12] = 0.9;
        c[(root + fifth) % 12] = 0.95;
        c
    }

    fn frame_times(n: usize, step: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * step).collect()
    }

    #[test]
    fn test_constant_chord_merges_into_one_event() {
        let chroma = vec![triad(0, 4, 7); 16];
        let times = frame_times(16, 0.1);
        let result = infer_chords(&chroma, &times, 400.0, 200.0).unwrap();

        assert_eq!(result.chords.len(), 1, "chords: {:?}", result.chords);
        let chord = &result.chords[0];
        assert!(chord.label.starts_with('C'), "label {}", chord.label);
        assert_eq!(chord.root_pitch_class, Some(0));
        assert!(chord.duration_sec > 1.0, "duration {}", chord.duration_sec);
        assert_eq!(result.windows.len(), 8);
    }

    #[test]
    fn test_chord_change_splits_events() {
        let mut chroma = vec![triad(0, 4, 7); 10];
        chroma.extend(vec![triad(7, 4, 7); 10]);
        let times = frame_times(20, 0.1);
        let result = infer_chords(&chroma, &times, 400.0, 200.0).unwrap();

        let labels: Vec<&str> = result.chords.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"C"));
        assert_eq!(labels.last(), Some(&"G"));

        // Events never overlap
        for pair in result.chords.windows(2) {
            assert!(
                pair[0].end_sec() <= pair[1].start_sec + 1e-6,
                "{:?} overlaps {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_low_confidence_window_is_carried_forward() {
        let mut chroma = vec![triad(0, 4, 7); 4];
        chroma.extend(vec![[1.0; 12]; 4]);
        let times = frame_times(8, 0.25);
        let result = infer_chords(&chroma, &times, 250.0, 250.0).unwrap();

        assert_eq!(result.chords.len(), 1);
        assert_eq!(result.chords[0].label, "C");
        assert!(result.windows[4].carried_forward);
        assert_eq!(result.windows[4].stabilized_label, "C");
        assert!(result.windows[4].confidence < HYSTERESIS_CONFIDENCE);
    }

    #[test]
    fn test_first_window_is_never_carried() {
        let chroma = vec![[1.0; 12]; 4];
        let times = frame_times(4, 0.1);
        let result = infer_chords(&chroma, &times, 400.0, 200.0).unwrap();
        assert!(!result.windows[0].carried_forward);
    }

    #[test]
    fn test_gaps_and_silence_are_skipped() {
        let chroma = vec![triad(2, 3, 7), [0.0; 12], triad(2, 3, 7)];
        let times = vec![0.0, 0.6, 3.0];
        let result = infer_chords(&chroma, &times, 500.0, 500.0).unwrap();

        // Windows at 0.0 and 3.0 have chords; 0.5 holds only silence; the rest are empty
        assert_eq!(result.windows.len(), 2);
        assert_eq!(result.chords.len(), 1);
        assert_eq!(result.chords[0].label, "Dm");
    }

    #[test]
    fn test_empty_input() {
        let result = infer_chords(&[], &[], 500.0, 250.0).unwrap();
        assert!(result.chords.is_empty());
        assert!(result.windows.is_empty());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(infer_chords(&[[0.0; 12]], &[], 500.0, 250.0).is_err());
        assert!(infer_chords(&[], &[], 0.0, 250.0).is_err());
        assert!(infer_chords(&[], &[], 500.0, f32::INFINITY).is_err());
    }
}
