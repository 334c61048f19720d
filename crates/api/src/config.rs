//! Application Configuration
//!
//! Loaded from an optional TOML file, then overridden by `MUSIC_FEATURES_*`
//! environment variables.

use config::{Config, Environment, File, FileFormat};
use dataset_builder::{FailurePolicy, DEFAULT_EXTENSIONS};
use extractor::DEFAULT_ESSENTIA_BINARY;
use feature_engine::{FeatureError, FieldEntry, FieldSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "MUSIC_FEATURES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid field list: {0}")]
    Fields(#[from] FeatureError),
}

/// Which extractor backs the `extract` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Run the Essentia command-line extractor
    #[default]
    Essentia,
    /// Read `<file>.json` documents produced earlier
    JsonSidecar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned for audio files
    pub input_dir: Option<PathBuf>,
    /// Dataset written by `extract` and served by `serve`
    pub output_csv: PathBuf,
    /// JSON-lines file receiving skipped files
    pub fault_log: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub extractor: ExtractorKind,
    pub essentia_binary: String,
    /// Essentia extractor profile (YAML)
    pub essentia_profile: Option<String>,
    pub bind_addr: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Column layout overriding the default music schema
    pub fields: Option<Vec<FieldEntry>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_csv: PathBuf::from("Viral_Music_Dataset.csv"),
            fault_log: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            failure_policy: FailurePolicy::default(),
            extractor: ExtractorKind::default(),
            essentia_binary: DEFAULT_ESSENTIA_BINARY.to_string(),
            essentia_profile: None,
            bind_addr: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
            fields: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(path, environment())
    }

    fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            let path = path.to_string_lossy().into_owned();
            builder = builder.add_source(File::new(&path, FileFormat::Toml));
        }
        let cfg = builder.add_source(env).build()?;
        Ok(cfg.try_deserialize::<AppConfig>()?)
    }

    /// Output schema: the configured field list or the default music schema
    pub fn field_spec(&self) -> Result<FieldSpec, ConfigError> {
        match &self.fields {
            Some(entries) => Ok(FieldSpec::new(entries.clone())?),
            None => Ok(FieldSpec::music_default()),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("extensions")
}
