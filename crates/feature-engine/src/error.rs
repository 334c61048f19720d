//! Feature Engine Error Types

use thiserror::Error;

/// Errors raised while building schemas, stores and datasets
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Two schema entries share an output column name
    #[error("Duplicate output field name: {0}")]
    DuplicateOutputName(String),

    /// Schema has no entries
    #[error("Field spec must contain at least one field")]
    EmptySpec,

    /// Measurement document is not shaped like a store
    #[error("Invalid measurement store: {0}")]
    InvalidStore(String),

    /// Record columns do not match the dataset columns
    #[error("Record columns {actual:?} do not match dataset columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
