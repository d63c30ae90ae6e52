//! Error types for the transcription engine

use std::fmt;

/// Errors that can occur during analysis or export
///
/// Silent or empty audio is not an error: every stage has a zero/absence
/// fallback and the pipeline still returns a well-formed result.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (bad sample rate, non-finite samples, bad options)
    InvalidInput(String),

    /// Feature not yet implemented
    NotImplemented(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// MIDI serialization error (value out of range for the file format)
    EncodingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::ProcessingError(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AnalysisError::InvalidInput("sample rate must be > 0".to_string());
        assert_eq!(err.to_string(), "Invalid input: sample rate must be > 0");

        let err = AnalysisError::EncodingError("delta too large".to_string());
        assert_eq!(err.to_string(), "Encoding error: delta too large");
    }
}
