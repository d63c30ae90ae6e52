//! Short-time Fourier transform framing
//!
//! Frames start every `hop_size` samples. Frames that run past the end of the
//! buffer are zero-padded; the first such partial frame is the last one
//! processed.

use serde::{Deserialize, Serialize};

use super::fft::fft_in_place;
use super::window::hann_window;
use crate::error::AnalysisError;

/// Magnitude spectrogram of a buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrogram {
    /// One magnitude spectrum per frame, `frame_size / 2` bins each
    pub frames: Vec<Vec<f32>>,
    /// Frame start times in seconds (`frame_start / sample_rate`)
    pub times: Vec<f32>,
    /// FFT frame size in samples
    pub frame_size: usize,
    /// Hop between frame starts in samples
    pub hop_size: usize,
    /// Sample rate in Hz
    pub sample_rate: f32,
}

impl Spectrogram {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frame was produced (empty input)
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Center frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate / self.frame_size as f32
    }

    /// Hop duration in seconds
    pub fn hop_seconds(&self) -> f32 {
        self.hop_size as f32 / self.sample_rate
    }
}

/// Compute the magnitude STFT of a mono buffer
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT size, a power of two (2048 in the transcription path)
/// * `hop_size` - Hop between frames in samples
///
/// # Errors
///
/// `InvalidInput` if `frame_size` is not a power of two or `hop_size` is zero.
pub fn compute_stft(
    samples: &[f32],
    sample_rate: f32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, AnalysisError> {
    if frame_size < 2 || !frame_size.is_power_of_two() {
        return Err(AnalysisError::InvalidInput(format!(
            "STFT frame size must be a power of two >= 2, got {}",
            frame_size
        )));
    }
    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let window = hann_window(frame_size);
    let n_bins = frame_size / 2;
    let mut frames = Vec::new();
    let mut times = Vec::new();
    let mut re = vec![0.0f32; frame_size];
    let mut im = vec![0.0f32; frame_size];

    let mut start = 0usize;
    while start < samples.len() {
        let available = (samples.len() - start).min(frame_size);
        for i in 0..frame_size {
            re[i] = if i < available {
                samples[start + i] * window[i]
            } else {
                0.0
            };
            im[i] = 0.0;
        }

        fft_in_place(&mut re, &mut im)?;

        frames.push(
            re[..n_bins]
                .iter()
                .zip(&im[..n_bins])
                .map(|(r, i)| (r * r + i * i).sqrt())
                .collect(),
        );
        times.push(start as f32 / sample_rate);

        if start + frame_size >= samples.len() {
            break;
        }
        start += hop_size;
    }

    log::debug!(
        "STFT: {} samples -> {} frames (frame={}, hop={})",
        samples.len(),
        frames.len(),
        frame_size,
        hop_size
    );

    Ok(Spectrogram {
        frames,
        times,
        frame_size,
        hop_size,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_frames() {
        let spec = compute_stft(&[], 44100.0, 2048, 512).unwrap();
        assert!(spec.is_empty());
        assert!(spec.times.is_empty());
    }

    #[test]
    fn test_frame_count_and_times() {
        // Frames at 0, 512, 1024; the frame at 1024 is the first partial one
        let samples = vec![0.1f32; 3000];
        let spec = compute_stft(&samples, 1000.0, 2048, 512).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.times, vec![0.0, 0.512, 1.024]);
        assert!(spec.frames.iter().all(|f| f.len() == 1024));
    }

    #[test]
    fn test_short_buffer_single_padded_frame() {
        let spec = compute_stft(&[0.5; 100], 44100.0, 2048, 512).unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.times[0], 0.0);
    }

    #[test]
    fn test_exact_fit_stops_after_full_frame() {
        let spec = compute_stft(&vec![0.5; 2048], 44100.0, 2048, 512).unwrap();
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_peak_bin_matches_frequency() {
        let sr = 44100.0;
        let samples = sine(440.0, sr, 8192);
        let spec = compute_stft(&samples, sr, 2048, 1024).unwrap();
        let frame = &spec.frames[0];
        let (peak_bin, _) = frame
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |acc, (k, &m)| if m > acc.1 { (k, m) } else { acc });
        let peak_freq = spec.bin_frequency(peak_bin);
        assert!(
            (peak_freq - 440.0).abs() < sr / 2048.0,
            "peak at {:.1} Hz",
            peak_freq
        );
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(compute_stft(&[0.0; 10], 44100.0, 1000, 256).is_err());
        assert!(compute_stft(&[0.0; 10], 44100.0, 1024, 0).is_err());
    }
}
