//! Error types for the analysis engine
//!
//! "Nothing detected" is never an error here: stages return `Ok(None)` for
//! silence, ambiguous spectra, too few onsets and out-of-range estimates.
//! Only inputs the caller was obliged to get right surface as `AnalysisError`.

use thiserror::Error;

/// Errors that can occur during audio analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Invalid input parameters (zero sample rate, empty or too-short frame, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Processing error during analysis
    #[error("Processing error: {0}")]
    ProcessingError(String),

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The analysis was cancelled through its `CancellationToken`
    #[error("Analysis cancelled")]
    Cancelled,
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AnalysisError {
    fn from(err: toml::ser::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::InvalidInput("Invalid sample rate: 0".to_string());
        assert_eq!(err.to_string(), "Invalid input: Invalid sample rate: 0");
        assert_eq!(AnalysisError::Cancelled.to_string(), "Analysis cancelled");
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: AnalysisError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
