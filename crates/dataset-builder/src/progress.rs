//! Progress Reporting

use std::path::Path;
use tracing::{info, warn};

/// Receives per-file progress notifications during a build
///
/// Purely diagnostic: observers never influence the dataset.
pub trait ProgressObserver {
    /// A file is about to be analysed
    fn on_file_started(&self, index: usize, total: usize, path: &Path);

    /// A file was analysed and flattened
    fn on_file_finished(&self, _index: usize, _total: usize, _path: &Path) {}

    /// A file failed to analyse
    fn on_file_failed(&self, _index: usize, _total: usize, _path: &Path, _error: &str) {}
}

/// Logs progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_file_started(&self, index: usize, total: usize, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Processing {}... ({}/{})", name, index + 1, total);
    }

    fn on_file_failed(&self, index: usize, total: usize, path: &Path, error: &str) {
        warn!("File {}/{} {} failed: {}", index + 1, total, path.display(), error);
    }
}

/// Discards all notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_file_started(&self, _index: usize, _total: usize, _path: &Path) {}
}
