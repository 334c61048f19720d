//! Essentia Music Extractor
//!
//! Runs Essentia's streaming music extractor on a file and reads back the JSON
//! document it writes.

use crate::error::ExtractionError;
use crate::Extractor;
use feature_engine::MeasurementStore;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Binary looked up in PATH when none is configured
pub const DEFAULT_ESSENTIA_BINARY: &str = "essentia_streaming_extractor_music";

/// Extractor backed by the Essentia command-line tool
#[derive(Debug, Clone)]
pub struct EssentiaExtractor {
    /// Binary name or path
    binary: String,
    /// Optional extractor profile (YAML) passed as the third argument
    profile: Option<String>,
}

impl EssentiaExtractor {
    /// Create an extractor using the given binary
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            profile: None,
        }
    }

    /// Use an extractor profile file
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Check whether the binary can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary).arg("--help").output().is_ok()
    }
}

impl Default for EssentiaExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ESSENTIA_BINARY)
    }
}

impl Extractor for EssentiaExtractor {
    fn extract(&self, path: &Path) -> Result<MeasurementStore, ExtractionError> {
        if !path.is_file() {
            return Err(ExtractionError::FileNotFound(path.to_path_buf()));
        }

        let output_file = tempfile::Builder::new()
            .prefix("essentia_")
            .suffix(".json")
            .tempfile()?;

        debug!(
            audio_file = %path.display(),
            output_file = %output_file.path().display(),
            "Running Essentia analysis"
        );

        let mut command = Command::new(&self.binary);
        command.arg(path).arg(output_file.path());
        if let Some(profile) = &self.profile {
            command.arg(profile);
        }

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExtractionError::BinaryNotFound(self.binary.clone()),
            _ => ExtractionError::ExecutionFailed(e.to_string()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::AnalysisFailed {
                path: path.to_path_buf(),
                detail: format!("exit code {:?}: {}", output.status.code(), stderr.trim()),
            });
        }

        let json = std::fs::read_to_string(output_file.path())?;
        let store = MeasurementStore::from_json_str(&json)?;

        info!(
            audio_file = %path.display(),
            entries = store.len(),
            "Essentia analysis completed"
        );
        Ok(store)
    }
}
