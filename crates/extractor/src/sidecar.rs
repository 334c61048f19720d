//! Precomputed JSON Sidecars
//!
//! Reads `<audio file>.json` documents written by an earlier analysis run, so
//! datasets can be rebuilt without the analysis engine installed.

use crate::error::ExtractionError;
use crate::Extractor;
use feature_engine::MeasurementStore;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extractor that loads a JSON document stored next to each audio file
#[derive(Debug, Clone)]
pub struct JsonSidecarExtractor {
    suffix: String,
}

impl JsonSidecarExtractor {
    /// Sidecars named `<file><suffix>`, e.g. `song.mp3.json`
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Sidecar location for an audio file
    pub fn sidecar_path(&self, audio: &Path) -> PathBuf {
        let mut name: OsString = audio.as_os_str().to_owned();
        name.push(&self.suffix);
        PathBuf::from(name)
    }
}

impl Default for JsonSidecarExtractor {
    fn default() -> Self {
        Self::new(".json")
    }
}

impl Extractor for JsonSidecarExtractor {
    fn extract(&self, path: &Path) -> Result<MeasurementStore, ExtractionError> {
        let sidecar = self.sidecar_path(path);
        if !sidecar.is_file() {
            return Err(ExtractionError::FileNotFound(sidecar));
        }

        debug!("Loading measurements from {}", sidecar.display());
        let json = std::fs::read_to_string(&sidecar)?;
        Ok(MeasurementStore::from_json_str(&json)?)
    }
}
