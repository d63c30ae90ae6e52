//! Peak normalization
//!
//! # Example
//!
//! ```
//! use tonescribe::preprocessing::normalization::normalize_peak;
//!
//! let (normalized, metadata) = normalize_peak(&[0.25, -0.5, 0.1], 0.98);
//! assert!((normalized[1] + 0.98).abs() < 1e-6);
//! assert!((metadata.gain - 1.96).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

/// Default peak level after normalization
pub const DEFAULT_TARGET_PEAK: f32 = 0.98;

/// Level metadata returned from normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    /// Absolute peak before normalization
    pub peak: f32,
    /// Linear gain applied (1.0 when the input was silent)
    pub gain: f32,
}

impl NormalizationMetadata {
    /// Peak level in dB before normalization (`-inf` for silence)
    pub fn peak_db(&self) -> f32 {
        if self.peak > 0.0 {
            20.0 * self.peak.log10()
        } else {
            f32::NEG_INFINITY
        }
    }
}

/// Scale samples so the largest absolute value equals `target_peak`
///
/// Never fails and never divides by zero: an empty or all-zero buffer comes
/// back as an unchanged copy with a gain of 1.0.
pub fn normalize_peak(samples: &[f32], target_peak: f32) -> (Vec<f32>, NormalizationMetadata) {
    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak == 0.0 {
        if !samples.is_empty() {
            log::warn!("Audio is silent, skipping peak normalization");
        }
        return (
            samples.to_vec(),
            NormalizationMetadata { peak, gain: 1.0 },
        );
    }

    let gain = target_peak / peak;
    let normalized = samples.iter().map(|&x| x * gain).collect();

    log::debug!(
        "Peak normalization: peak={:.4} ({:.2} dB), gain={:.4}",
        peak,
        20.0 * peak.log10(),
        gain
    );

    (normalized, NormalizationMetadata { peak, gain })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_test_signal(length: usize, amplitude: f32, sample_rate: f32) -> Vec<f32> {
        (0..length)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin()
            })
            .collect()
    }

    #[test]
    fn test_peak_normalization() {
        let samples = generate_test_signal(44100, 0.5, 44100.0);
        let (normalized, metadata) = normalize_peak(&samples, DEFAULT_TARGET_PEAK);

        let new_peak = normalized.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
        assert!(
            (new_peak - DEFAULT_TARGET_PEAK).abs() < 1e-4,
            "Peak normalization failed: expected ~{:.3}, got {:.3}",
            DEFAULT_TARGET_PEAK,
            new_peak
        );
        assert!(metadata.gain > 1.9 && metadata.gain < 2.0);
        assert!(metadata.peak_db() < 0.0);
    }

    #[test]
    fn test_silent_audio() {
        let samples = vec![0.0f32; 1024];
        let (normalized, metadata) = normalize_peak(&samples, DEFAULT_TARGET_PEAK);

        assert_eq!(normalized, samples);
        assert_eq!(metadata.gain, 1.0);
        assert_eq!(metadata.peak_db(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_empty_samples() {
        let (normalized, metadata) = normalize_peak(&[], DEFAULT_TARGET_PEAK);
        assert!(normalized.is_empty());
        assert_eq!(metadata.peak, 0.0);
    }

    #[test]
    fn test_negative_peak_is_used() {
        let (normalized, _) = normalize_peak(&[0.1, -0.4, 0.2], 0.8);
        assert!((normalized[1] + 0.8).abs() < 1e-6);
        assert!((normalized[0] - 0.2).abs() < 1e-6);
    }
}
