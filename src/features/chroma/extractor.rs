//! Pitch projection
//!
//! Maps each magnitude spectrum onto a 12-bin chroma vector and a 128-slot
//! per-semitone energy vector.
//!
//! Bins between 27.5 Hz (A0) and 5 kHz are assigned to the nearest MIDI
//! semitone `round(69 + 12 * log2(f / 440))`. The semitone vector uses that
//! number directly; chroma folds it into a pitch class after clamping to
//! [36, 96].

use serde::{Deserialize, Serialize};

use super::normalization::normalize_max;
use super::Chroma;
use crate::features::spectral::Spectrogram;

/// Lowest bin frequency that is projected (A0)
pub const MIN_FREQUENCY_HZ: f32 = 27.5;

/// Highest bin frequency that is projected
pub const MAX_FREQUENCY_HZ: f32 = 5000.0;

/// Semitone range used when folding into chroma
pub const CHROMA_MIDI_RANGE: (u8, u8) = (36, 96);

/// Number of per-semitone slots (the MIDI range)
pub const SEMITONE_SLOTS: usize = 128;

/// Per-frame pitch features for a whole buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchProjection {
    /// Peak-normalized chroma, one per frame
    pub chroma: Vec<Chroma>,
    /// Raw per-semitone energy, one 128-slot vector per frame
    pub semitone_energy: Vec<Vec<f32>>,
    /// Frame start times in seconds
    pub times: Vec<f32>,
    /// Hop duration in seconds
    pub hop_seconds: f32,
}

/// Nearest MIDI semitone for a frequency in Hz
pub fn frequency_to_midi(freq_hz: f32) -> i32 {
    (69.0 + 12.0 * (freq_hz / 440.0).log2()).round() as i32
}

/// Precomputed bin -> semitone assignment for one frame layout
#[derive(Debug, Clone)]
struct BinMap {
    /// (bin index, semitone, chroma pitch class)
    entries: Vec<(usize, usize, usize)>,
}

impl BinMap {
    fn new(n_bins: usize, sample_rate: f32, frame_size: usize) -> Self {
        let (lo, hi) = CHROMA_MIDI_RANGE;
        let entries = (0..n_bins)
            .filter_map(|k| {
                let freq = k as f32 * sample_rate / frame_size as f32;
                if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&freq) {
                    return None;
                }
                let midi = frequency_to_midi(freq);
                if !(0..SEMITONE_SLOTS as i32).contains(&midi) {
                    return None;
                }
                let pitch_class = (midi.clamp(lo as i32, hi as i32) % 12) as usize;
                Some((k, midi as usize, pitch_class))
            })
            .collect();
        Self { entries }
    }

    fn project(&self, magnitudes: &[f32]) -> (Chroma, Vec<f32>) {
        let mut chroma = [0.0f32; 12];
        let mut semitones = vec![0.0f32; SEMITONE_SLOTS];
        for &(k, midi, pc) in &self.entries {
            let Some(&energy) = magnitudes.get(k) else {
                continue;
            };
            chroma[pc] += energy;
            semitones[midi] += energy;
        }
        (normalize_max(&chroma), semitones)
    }
}

/// Project a single magnitude spectrum
///
/// # Arguments
///
/// * `magnitudes` - `frame_size / 2` magnitudes
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT size the magnitudes came from
///
/// # Returns
///
/// Peak-normalized chroma and raw per-semitone energy
pub fn project_frame(magnitudes: &[f32], sample_rate: f32, frame_size: usize) -> (Chroma, Vec<f32>) {
    BinMap::new(magnitudes.len(), sample_rate, frame_size).project(magnitudes)
}

/// Project every frame of a spectrogram
pub fn project_spectrogram(spectrogram: &Spectrogram) -> PitchProjection {
    let map = BinMap::new(
        spectrogram.frame_size / 2,
        spectrogram.sample_rate,
        spectrogram.frame_size,
    );

    log::debug!(
        "Projecting {} frames onto {} pitched bins",
        spectrogram.len(),
        map.entries.len()
    );

    let (chroma, semitone_energy) = spectrogram
        .frames
        .iter()
        .map(|frame| map.project(frame))
        .unzip();

    PitchProjection {
        chroma,
        semitone_energy,
        times: spectrogram.times.clone(),
        hop_seconds: spectrogram.hop_seconds(),
    }
}
