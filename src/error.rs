//! Error types for the onset analysis pipeline

use std::fmt;

/// Errors that can occur during onset analysis
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio file could not be opened or decoded
    DecodingError(String),

    /// Onset detection returned no candidates
    NoOnsetsDetected,

    /// Processing error during analysis
    ProcessingError(String),

    /// Failure while persisting the data file or the plot
    OutputError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Error loading audio file: {}", msg),
            AnalysisError::NoOnsetsDetected => write!(f, "No onsets were detected"),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::OutputError(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AnalysisError::DecodingError(err.to_string())
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::OutputError(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::OutputError(err.to_string())
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        AnalysisError::OutputError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AnalysisError::NoOnsetsDetected.to_string(),
            "No onsets were detected"
        );
        let err = AnalysisError::DecodingError("missing.mp3: not found".to_string());
        assert!(err.to_string().starts_with("Error loading audio file"));
    }

    #[test]
    fn test_io_error_maps_to_output_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::OutputError(_)));
    }

    #[test]
    fn test_image_error_maps_to_output_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err: AnalysisError = image::ImageError::IoError(io).into();
        assert!(matches!(err, AnalysisError::OutputError(_)));
    }
}
