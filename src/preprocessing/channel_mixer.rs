//! Channel mixing utilities
//!
//! Only single-channel input is supported. Interleaved multi-channel buffers
//! are rejected rather than mixed with a guessed strategy.

use crate::error::AnalysisError;

/// Convert an interleaved buffer to a single channel
///
/// # Arguments
///
/// * `samples` - Interleaved samples
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// A mono copy of the input
///
/// # Errors
///
/// `InvalidInput` for zero channels, `NotImplemented` for more than one.
pub fn to_mono(samples: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    match channels {
        0 => Err(AnalysisError::InvalidInput(
            "Channel count must be >= 1".to_string(),
        )),
        1 => Ok(samples.to_vec()),
        n => {
            log::warn!("Refusing to mix {} channels down to mono", n);
            Err(AnalysisError::NotImplemented(format!(
                "Mixing {} channels to mono is not implemented; pass a mono buffer",
                n
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_is_identity_copy() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(to_mono(&samples, 1).unwrap(), samples);
    }

    #[test]
    fn test_multichannel_is_flagged() {
        let result = to_mono(&[0.1, 0.2, 0.3, 0.4], 2);
        assert!(matches!(result, Err(AnalysisError::NotImplemented(_))));
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(matches!(
            to_mono(&[0.0], 0),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
