//! Spectral analysis modules
//!
//! - Radix-2 FFT (in place, split real/imaginary arrays)
//! - Hann window
//! - Magnitude STFT

pub mod fft;
pub mod stft;
pub mod window;

pub use stft::{compute_stft, Spectrogram};

/// FFT frame size used by the transcription pipeline
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Hop size in samples for a time resolution in milliseconds (at least 1)
pub fn hop_size_for(sample_rate: f32, time_resolution_ms: f32) -> usize {
    ((sample_rate * time_resolution_ms / 1000.0).round() as usize).max(1)
}
