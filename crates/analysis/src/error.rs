//! Analysis Error Types

use thiserror::Error;

/// Errors from dataset analysis
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// Column not present in the dataset
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Column exists but holds no numeric values
    #[error("Column {0} is not numeric")]
    NotNumeric(String),

    /// Too few rows for the requested computation
    #[error("Need at least {required} rows, got {actual}")]
    NotEnoughRows { required: usize, actual: usize },

    /// Parameter outside its allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Matrix width differs from the fitted feature count
    #[error("Expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// No features selected
    #[error("At least one feature must be selected")]
    NoFeatures,

    /// Clustering backend failure
    #[error("Clustering failed: {0}")]
    Clustering(String),
}
