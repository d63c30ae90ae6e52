//! Harmonic-percussive source separation (HPSS) placeholder
//!
//! No separation is performed. The input is returned as the harmonic part,
//! the percussive part is silence of equal length, and a warning is attached
//! so callers can see the request was not honored.

/// Warning attached whenever separation is requested
pub const HPSS_PLACEHOLDER_WARNING: &str =
    "HPSS requested but not implemented: harmonic = input, percussive = silence";

/// Output of the separation placeholder
#[derive(Debug, Clone)]
pub struct HpssOutput {
    /// Harmonic component (the unmodified input)
    pub harmonic: Vec<f32>,
    /// Percussive component (all zeros)
    pub percussive: Vec<f32>,
    /// Warning describing the passthrough
    pub warning: String,
}

/// Split a signal into harmonic and percussive parts (passthrough)
pub fn separate(samples: &[f32]) -> HpssOutput {
    log::warn!("{}", HPSS_PLACEHOLDER_WARNING);
    HpssOutput {
        harmonic: samples.to_vec(),
        percussive: vec![0.0; samples.len()],
        warning: HPSS_PLACEHOLDER_WARNING.to_string(),
    }
}
