//! In-Memory Extractor for Testing

use crate::error::ExtractionError;
use crate::Extractor;
use feature_engine::MeasurementStore;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extractor serving canned stores, with optional simulated failures
#[derive(Debug, Default)]
pub struct MockExtractor {
    stores: HashMap<PathBuf, MeasurementStore>,
    failures: HashSet<PathBuf>,
    calls: RefCell<Vec<PathBuf>>,
}

impl MockExtractor {
    /// Create a mock with no known files
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `store` for `path`
    pub fn with_store(mut self, path: impl Into<PathBuf>, store: MeasurementStore) -> Self {
        self.stores.insert(path.into(), store);
        self
    }

    /// Fail analysis for `path` as a corrupt file would
    pub fn with_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.failures.insert(path.into());
        self
    }

    /// Paths requested so far, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, path: &Path) -> Result<MeasurementStore, ExtractionError> {
        debug!("Mock extraction for {}", path.display());
        self.calls.borrow_mut().push(path.to_path_buf());

        if self.failures.contains(path) {
            return Err(ExtractionError::AnalysisFailed {
                path: path.to_path_buf(),
                detail: "simulated decode error".to_string(),
            });
        }

        self.stores
            .get(path)
            .cloned()
            .ok_or_else(|| ExtractionError::FileNotFound(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_serves_and_fails() {
        let mock = MockExtractor::new()
            .with_store("a.wav", MeasurementStore::new().with("rhythm.bpm", 100.0))
            .with_failure("b.wav");

        assert!(mock.extract(Path::new("a.wav")).is_ok());
        assert!(matches!(
            mock.extract(Path::new("b.wav")),
            Err(ExtractionError::AnalysisFailed { .. })
        ));
        assert!(matches!(
            mock.extract(Path::new("c.wav")),
            Err(ExtractionError::FileNotFound(_))
        ));
        assert_eq!(mock.calls().len(), 3);
    }

    #[test]
    fn test_closure_is_an_extractor() {
        let extract = |path: &Path| -> Result<MeasurementStore, ExtractionError> {
            Ok(MeasurementStore::new().with("file", path.display().to_string()))
        };
        let store = extract.extract(Path::new("x.mp3")).unwrap();
        assert!(store.contains("file"));
    }
}
