//! Extraction Pipeline
//!
//! Scan, extract, flatten, persist. Under fail-fast nothing is written when a
//! file fails.

use crate::config::{AppConfig, ExtractorKind};
use anyhow::{Context, Result};
use dataset_builder::{scan_audio_dir, BuildReport, BuilderConfig, DatasetBuilder};
use extractor::{EssentiaExtractor, Extractor, JsonSidecarExtractor};
use tracing::{info, warn};

/// Build the dataset described by `config` and write it to `output_csv`
pub fn run_extract(config: &AppConfig) -> Result<BuildReport> {
    let input_dir = config
        .input_dir
        .as_deref()
        .context("No input directory configured (set input_dir or pass --input-dir)")?;
    let spec = config.field_spec()?;

    let files = scan_audio_dir(input_dir, config.extensions.as_slice())
        .with_context(|| format!("Failed to scan {}", input_dir.display()))?;
    if files.is_empty() {
        warn!("No audio files found in {}", input_dir.display());
    }

    let extractor: Box<dyn Extractor> = match config.extractor {
        ExtractorKind::Essentia => {
            let mut essentia = EssentiaExtractor::new(config.essentia_binary.clone());
            if let Some(profile) = &config.essentia_profile {
                essentia = essentia.with_profile(profile.clone());
            }
            Box::new(essentia)
        }
        ExtractorKind::JsonSidecar => Box::new(JsonSidecarExtractor::default()),
    };

    let builder = DatasetBuilder::new(BuilderConfig {
        failure_policy: config.failure_policy,
    });
    let report = builder.build(&files, extractor.as_ref(), &spec)?;

    storage::save_dataset(&report.dataset, &config.output_csv)
        .with_context(|| format!("Failed to write {}", config.output_csv.display()))?;

    if let Some(path) = &config.fault_log {
        storage::write_fault_log(&report.faults, path)
            .with_context(|| format!("Failed to write fault log {}", path.display()))?;
    }

    info!(
        "Wrote {} rows to {} ({} files skipped)",
        report.succeeded(),
        config.output_csv.display(),
        report.failed()
    );
    Ok(report)
}
