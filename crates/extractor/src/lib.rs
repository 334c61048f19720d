//! Audio Analysis Extractors
//!
//! An [`Extractor`] turns one audio file into a [`MeasurementStore`]. The
//! analysis itself happens in an external engine; this crate wraps the ways of
//! reaching it.

mod error;
mod essentia;
mod mock;
mod sidecar;

pub use error::ExtractionError;
pub use essentia::{EssentiaExtractor, DEFAULT_ESSENTIA_BINARY};
pub use mock::MockExtractor;
pub use sidecar::JsonSidecarExtractor;

use feature_engine::MeasurementStore;
use std::path::Path;

/// Source of measurements for a single audio file
///
/// Implementations may block for as long as the analysis takes.
pub trait Extractor {
    /// Analyse one file
    fn extract(&self, path: &Path) -> Result<MeasurementStore, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<MeasurementStore, ExtractionError>,
{
    fn extract(&self, path: &Path) -> Result<MeasurementStore, ExtractionError> {
        self(path)
    }
}
