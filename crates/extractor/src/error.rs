//! Extraction Error Types

use feature_engine::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analysing one audio file
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Analysis binary not found in PATH
    #[error("Analysis binary not found: {0}")]
    BinaryNotFound(String),

    /// Audio file does not exist
    #[error("Audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Analysis process could not be run
    #[error("Failed to execute analysis: {0}")]
    ExecutionFailed(String),

    /// Analysis ran but rejected the file (corrupt, unsupported codec, ...)
    #[error("Analysis failed for {}: {detail}", .path.display())]
    AnalysisFailed { path: PathBuf, detail: String },

    /// Analysis output could not be parsed
    #[error("Failed to parse analysis output: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FeatureError> for ExtractionError {
    fn from(err: FeatureError) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}
