//! Audio Directory Scanner

use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extensions accepted when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// List the audio files directly inside `dir`
///
/// Only regular files whose extension matches one of `extensions`
/// (case-insensitive, with or without a leading dot) are returned. The result
/// is sorted by file name so runs are reproducible across platforms.
pub fn scan_audio_dir<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if has_supported_extension(&path, &wanted) {
            files.push(path);
        } else {
            debug!("Skipping unsupported file {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!("Found {} audio files in {}", files.len(), dir.display());
    Ok(files)
}

fn has_supported_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            wanted.iter().any(|w| *w == ext)
        })
        .unwrap_or(false)
}
