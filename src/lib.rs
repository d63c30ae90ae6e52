//! # Tonescribe
//!
//! Offline transcription of a decoded mono audio buffer into symbolic music:
//! notes, a melody/harmony split, a chord progression, a key estimate, an
//! atonality score, and a Standard MIDI File.
//!
//! ## Features
//!
//! - **Note Tracking**: Radix-2 STFT projected onto per-semitone energy, with a threshold state machine
//! - **Voice Splitting**: Top-voice voting separates melody from harmony
//! - **Chord Inference**: 120 chord templates, sliding windows, hysteresis and run merging
//! - **Key Estimation**: Krumhansl-Schmuckler profile correlation over 24 keys
//! - **Atonality**: Blend of key, chord and chroma instability signals
//! - **MIDI Export**: Byte-exact Type-1 SMF writer
//!
//! ## Quick Start
//!
//! ```
//! use tonescribe::{analyze, AnalysisOptions, MidiExportOptions};
//!
//! // One second of A4 at 22.05 kHz
//! let sample_rate = 22050.0;
//! let samples: Vec<f32> = (0..22050)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin())
//!     .collect();
//!
//! let result = analyze(&samples, sample_rate, AnalysisOptions::default())?;
//! println!("{} notes, key: {:?}", result.notes.len(), result.key.as_ref().map(|k| &k.label));
//!
//! let midi = result.to_midi(&MidiExportOptions::default())?;
//! assert_eq!(&midi[0..4], b"MThd");
//! # Ok::<(), tonescribe::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Samples -> Preprocessing -> STFT -> Pitch projection -> Notes -> Melody/Harmony
//!                                                    \-> Chords -> Key -> Atonality -> Result -> MIDI
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod midi;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{
    AnalysisDebug, AnalysisMetadata, AnalysisResult, ChordEvent, ChordWindowScore, KeyEstimate,
    KeyMode, NoteEvent,
};
pub use config::AnalysisOptions;
pub use error::AnalysisError;
pub use features::chords::ChordQuality;
pub use features::voicing::split_melody_harmony;
pub use midi::{encode_midi, MidiExportOptions};

use analysis::atonality::score_atonality;
use features::chords::{infer_chords, ChordInference};
use features::chroma::project_spectrogram;
use features::chroma::smoothing::smooth_chroma;
use features::key::estimate_key;
use features::notes::track_notes;
use features::spectral::{compute_stft, hop_size_for};

/// Warning recorded when the input has no energy
pub const SILENT_INPUT_WARNING: &str = "Input is empty or silent; results are degenerate";

/// Main analysis function
///
/// Runs the full transcription pipeline over a mono buffer.
///
/// # Arguments
///
/// * `samples` - Mono audio samples (any length, including zero)
/// * `sample_rate` - Sample rate in Hz
/// * `options` - Analysis options
///
/// # Returns
///
/// `AnalysisResult` with notes, melody/harmony, chords, key, atonality and
/// metadata. Silent or empty input is not an error: it yields no notes, no
/// chords, no key and an atonality score of 1.
///
/// # Errors
///
/// `InvalidInput` if the sample rate is not finite and > 0, if any sample is
/// not finite, or if the options fail validation.
///
/// # Example
///
/// ```
/// use tonescribe::{analyze, AnalysisOptions};
///
/// let result = analyze(&[0.0f32; 4096], 44100.0, AnalysisOptions::default())?;
/// assert!(result.notes.is_empty());
/// assert!(result.key.is_none());
/// # Ok::<(), tonescribe::AnalysisError>(())
/// ```
pub fn analyze(
    samples: &[f32],
    sample_rate: f32,
    options: AnalysisOptions,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting transcription: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample rate must be finite and > 0, got {}",
            sample_rate
        )));
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample {} is not finite ({})",
            index, samples[index]
        )));
    }
    options.validate()?;

    // Preprocessing
    let preprocessed =
        preprocessing::preprocess(samples, options.target_peak, options.do_hpss)?;
    let mut warnings = preprocessed.warnings.clone();
    if preprocessed.normalization.peak == 0.0 {
        log::warn!("{} ({} samples)", SILENT_INPUT_WARNING, samples.len());
        warnings.push(SILENT_INPUT_WARNING.to_string());
    }

    // Spectral analysis and pitch projection
    let hop_size = hop_size_for(sample_rate, options.time_resolution_ms);
    let spectrogram = compute_stft(
        &preprocessed.signal,
        sample_rate,
        options.frame_size,
        hop_size,
    )?;
    let projection = project_spectrogram(&spectrogram);
    let chroma = smooth_chroma(&projection.chroma, options.chroma_smoothing);

    // Notes and voices
    let notes = track_notes(
        &projection.semitone_energy,
        &projection.times,
        projection.hop_seconds,
        options.min_note_duration_ms,
    );
    let split = split_melody_harmony(
        &notes,
        options.time_resolution_ms,
        options.extract_melody,
        options.extract_harmony,
    )?;

    // Harmony
    let chord_inference = if options.infer_chords {
        infer_chords(
            &chroma,
            &projection.times,
            options.chord_window_ms,
            options.chord_hop_ms,
        )?
    } else {
        ChordInference::default()
    };
    let key = estimate_key(&chroma);

    let (atonal_score, is_atonal) = if options.detect_atonal {
        let report = score_atonality(
            key.as_ref(),
            &chord_inference.chords,
            &chroma,
            options.atonal_threshold,
        );
        (report.score, report.is_atonal)
    } else {
        (0.0, false)
    };

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Transcription complete: {} notes ({} melody, {} harmony), {} chords, key {:?}, atonal {:.3} in {:.1} ms",
        notes.len(),
        split.melody.len(),
        split.harmony.len(),
        chord_inference.chords.len(),
        key.as_ref().map(|k| k.label.as_str()),
        atonal_score,
        processing_time_ms
    );

    let metadata = AnalysisMetadata {
        duration_seconds: samples.len() as f32 / sample_rate,
        sample_rate,
        frame_count: spectrogram.len(),
        hop_size,
        processing_time_ms,
        algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        warnings: warnings.clone(),
    };

    let debug = if options.include_debug {
        Some(AnalysisDebug {
            frame_times: projection.times,
            raw_chroma: projection.chroma,
            chord_windows: chord_inference.windows,
            warnings,
        })
    } else {
        None
    };

    Ok(AnalysisResult {
        notes,
        melody: split.melody,
        harmony: split.harmony,
        chords: chord_inference.chords,
        key,
        atonal_score,
        is_atonal,
        metadata,
        debug,
    })
}
