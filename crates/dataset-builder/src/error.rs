//! Builder Error Types

use extractor::ExtractionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while listing the input directory
#[derive(Debug, Error)]
pub enum ScanError {
    /// Input path does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Input path is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Directory could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that abort a dataset build
#[derive(Debug, Error)]
pub enum BuildError {
    /// Extraction failed under the fail-fast policy
    #[error("Extraction failed for {}: {source}", .path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: ExtractionError,
    },

    /// Flattened record did not fit the dataset layout
    #[error("Dataset assembly failed: {0}")]
    Assembly(#[from] feature_engine::FeatureError),
}
