//! Dataset Build Driver

use crate::error::BuildError;
use crate::progress::{ProgressObserver, TracingObserver};
use extractor::Extractor;
use feature_engine::{flatten_path, Dataset, FieldSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What to do when analysis of one file fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole run on the first failure
    #[default]
    FailFast,
    /// Record the failure and continue with the next file
    SkipAndRecord,
}

/// Configuration for the dataset builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Failure handling for individual files
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl BuilderConfig {
    /// Isolate per-file failures instead of aborting
    pub fn tolerant() -> Self {
        Self {
            failure_policy: FailurePolicy::SkipAndRecord,
        }
    }
}

/// A file that could not be analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFault {
    pub path: PathBuf,
    pub message: String,
}

/// Result of a build: the rows that succeeded plus any isolated faults
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub dataset: Dataset,
    pub faults: Vec<FileFault>,
}

impl BuildReport {
    /// Number of files turned into rows
    pub fn succeeded(&self) -> usize {
        self.dataset.len()
    }

    /// Number of files skipped because of faults
    pub fn failed(&self) -> usize {
        self.faults.len()
    }
}

/// Sequential extraction driver
pub struct DatasetBuilder {
    config: BuilderConfig,
    observer: Box<dyn ProgressObserver>,
}

impl DatasetBuilder {
    /// Create a builder that reports progress through `tracing`
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the progress observer
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Extract and flatten every file, in order
    ///
    /// Under [`FailurePolicy::FailFast`] the first extraction error aborts the
    /// run and no dataset is returned.
    pub fn build<P, E>(&self, files: &[P], extractor: &E, spec: &FieldSpec) -> Result<BuildReport, BuildError>
    where
        P: AsRef<Path>,
        E: Extractor + ?Sized,
    {
        let total = files.len();
        let started = Instant::now();
        info!(
            "Building dataset from {} files ({:?})",
            total, self.config.failure_policy
        );

        let mut dataset = Dataset::for_spec(spec);
        let mut faults = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let path = file.as_ref();
            self.observer.on_file_started(index, total, path);

            let store = match extractor.extract(path) {
                Ok(store) => store,
                Err(e) => {
                    self.observer.on_file_failed(index, total, path, &e.to_string());
                    match self.config.failure_policy {
                        FailurePolicy::FailFast => {
                            return Err(BuildError::Extraction {
                                path: path.to_path_buf(),
                                source: e,
                            });
                        }
                        FailurePolicy::SkipAndRecord => {
                            warn!("Skipping {}: {}", path.display(), e);
                            faults.push(FileFault {
                                path: path.to_path_buf(),
                                message: e.to_string(),
                            });
                            continue;
                        }
                    }
                }
            };

            let record = flatten_path(&store, path, spec);
            dataset.push(record)?;
            debug!("Row {} appended for {}", dataset.len(), path.display());
            self.observer.on_file_finished(index, total, path);
        }

        info!(
            "Dataset built: {} rows, {} faults in {:.1}s",
            dataset.len(),
            faults.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(BuildReport { dataset, faults })
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
