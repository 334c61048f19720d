//! Storage Layer
//!
//! Persists datasets as CSV tables (one row per file, one column per schema
//! field) and per-file faults as JSON lines.

mod csv_store;
mod fault_log;

pub use csv_store::{load_dataset, read_dataset, save_dataset, write_dataset};
pub use fault_log::{read_fault_log, write_fault_log};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Table has no header row")]
    MissingHeader,
    #[error("Schema error: {0}")]
    Schema(#[from] feature_engine::FeatureError),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
