//! Output Schema
//!
//! A [`FieldSpec`] is the fixed, ordered column layout every flattened record
//! follows, independent of which measurements a given file produced.

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Configuration spelling of the "derive from file identifier" source
pub const FILE_NAME_SOURCE: &str = "@file_name";

/// Where an output column takes its value from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldSource {
    /// Base name of the processed file
    FileName,
    /// Dotted path into the measurement store
    Path(String),
}

impl From<String> for FieldSource {
    fn from(value: String) -> Self {
        if value == FILE_NAME_SOURCE {
            FieldSource::FileName
        } else {
            FieldSource::Path(value)
        }
    }
}

impl From<&str> for FieldSource {
    fn from(value: &str) -> Self {
        FieldSource::from(value.to_string())
    }
}

impl From<FieldSource> for String {
    fn from(source: FieldSource) -> Self {
        match source {
            FieldSource::FileName => FILE_NAME_SOURCE.to_string(),
            FieldSource::Path(path) => path,
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::FileName => f.write_str(FILE_NAME_SOURCE),
            FieldSource::Path(path) => f.write_str(path),
        }
    }
}

/// One `(source, output name)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub source: FieldSource,
    pub name: String,
}

impl FieldEntry {
    pub fn new(source: impl Into<FieldSource>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }
}

/// Ordered, immutable output schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    entries: Vec<FieldEntry>,
}

impl FieldSpec {
    /// Create a spec, rejecting empty schemas and duplicate output names
    pub fn new(entries: Vec<FieldEntry>) -> Result<Self, FeatureError> {
        if entries.is_empty() {
            return Err(FeatureError::EmptySpec);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(FeatureError::DuplicateOutputName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The music dashboard schema: file name plus ten Essentia descriptors
    pub fn music_default() -> Self {
        let entries = vec![
            FieldEntry::new(FieldSource::FileName, "song_name"),
            FieldEntry::new("metadata.audio_properties.length", "duration"),
            FieldEntry::new("rhythm.bpm", "tempo"),
            FieldEntry::new("rhythm.danceability", "danceability"),
            FieldEntry::new("lowlevel.average_loudness", "loudness"),
            FieldEntry::new("lowlevel.dynamic_complexity", "dynamic_complexity"),
            FieldEntry::new("tonal.key_edma.key", "key"),
            FieldEntry::new("tonal.key_edma.scale", "mode"),
            FieldEntry::new("tonal.key_edma.strength", "key_strength"),
            FieldEntry::new("lowlevel.mfcc.mean", "mfcc_mean"),
            FieldEntry::new("lowlevel.melbands.mean", "melbands_mean"),
        ];
        Self { entries }
    }

    /// Entries in column order
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    /// Output column names in order
    pub fn output_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed spec
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::music_default()
    }
}
