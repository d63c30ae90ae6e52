//! Audio preprocessing modules
//!
//! This module prepares a buffer for spectral analysis:
//! - Channel mixing (mono only)
//! - Peak normalization
//! - Harmonic/percussive separation (placeholder)

pub mod channel_mixer;
pub mod hpss;
pub mod normalization;

use crate::error::AnalysisError;
use normalization::NormalizationMetadata;

/// Result of preprocessing a buffer
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Normalized signal used for analysis (the harmonic part when HPSS is requested)
    pub signal: Vec<f32>,
    /// Percussive part, present only when HPSS was requested
    pub percussive: Option<Vec<f32>>,
    /// Normalization metadata
    pub normalization: NormalizationMetadata,
    /// Warnings raised while preprocessing
    pub warnings: Vec<String>,
}

/// Convert to mono, normalize, and optionally run the HPSS placeholder
///
/// Any input length is accepted; a zero buffer comes back as a zero buffer.
///
/// # Errors
///
/// Propagates errors from [`channel_mixer::to_mono`]. The analysis buffer is
/// always single-channel, so in practice this succeeds.
///
/// # Example
///
/// ```
/// use tonescribe::preprocessing::preprocess;
///
/// let out = preprocess(&[0.0; 16], 0.98, true)?;
/// assert_eq!(out.signal, vec![0.0; 16]);
/// assert_eq!(out.percussive, Some(vec![0.0; 16]));
/// assert_eq!(out.warnings.len(), 1);
/// # Ok::<(), tonescribe::AnalysisError>(())
/// ```
pub fn preprocess(
    samples: &[f32],
    target_peak: f32,
    do_hpss: bool,
) -> Result<Preprocessed, AnalysisError> {
    log::debug!(
        "Preprocessing {} samples (target_peak={}, hpss={})",
        samples.len(),
        target_peak,
        do_hpss
    );

    let mono = channel_mixer::to_mono(samples, 1)?;
    let (normalized, normalization) = normalization::normalize_peak(&mono, target_peak);

    if do_hpss {
        let split = hpss::separate(&normalized);
        Ok(Preprocessed {
            signal: split.harmonic,
            percussive: Some(split.percussive),
            normalization,
            warnings: vec![split.warning],
        })
    } else {
        Ok(Preprocessed {
            signal: normalized,
            percussive: None,
            normalization,
            warnings: Vec::new(),
        })
    }
}
