//! Error types for spectral analysis

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Coarse failure category reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Window size, algorithm, window function or sample rate rejected
    InvalidParameters,

    /// Not enough samples to fill a single analysis window
    InsufficientData,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Window size {size} is outside the supported range {min}..={max}")]
    WindowSizeOutOfRange { size: usize, min: usize, max: usize },

    #[error("Unknown window function id {id} (catalog has {count} entries)")]
    UnknownWindowFunction { id: usize, count: usize },

    #[error("Unknown algorithm index {0}")]
    UnknownAlgorithm(usize),

    #[error("Sample rate must be positive and finite (got {0} Hz)")]
    InvalidSampleRate(f64),

    #[error("Need at least {needed} samples for one window, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("No complete analysis window fits in the input")]
    NoWindows,

    #[error("Transform failed: {0}")]
    Transform(String),
}

impl AnalysisError {
    /// Map a detailed error onto its caller-visible category
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::WindowSizeOutOfRange { .. }
            | AnalysisError::UnknownWindowFunction { .. }
            | AnalysisError::UnknownAlgorithm(_)
            | AnalysisError::InvalidSampleRate(_)
            | AnalysisError::Transform(_) => ErrorKind::InvalidParameters,
            AnalysisError::InsufficientData { .. } | AnalysisError::NoWindows => {
                ErrorKind::InsufficientData
            }
        }
    }
}

impl From<realfft::FftError> for AnalysisError {
    fn from(err: realfft::FftError) -> Self {
        AnalysisError::Transform(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = AnalysisError::WindowSizeOutOfRange { size: 16, min: 32, max: 65536 };
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);

        let err = AnalysisError::InsufficientData { needed: 1024, available: 10 };
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert_eq!(AnalysisError::NoWindows.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::UnknownWindowFunction { id: 12, count: 10 };
        assert_eq!(
            err.to_string(),
            "Unknown window function id 12 (catalog has 10 entries)"
        );
    }
}
