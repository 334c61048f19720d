//! Track Filters

use crate::{column_values, numeric_values, AnalysisError};
use feature_engine::{Dataset, FeatureRecord, FeatureValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

const SONG_NAME: &str = "song_name";
const TEMPO: &str = "tempo";
const DURATION: &str = "duration";
const KEY: &str = "key";
const MODE: &str = "mode";

/// Dashboard filter over the track table
///
/// Unset criteria do not constrain. A row whose value is missing in a
/// constrained column never matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackFilter {
    /// Case-insensitive substring of the song name
    pub search: Option<String>,
    /// Inclusive tempo range (BPM)
    pub tempo: Option<(f64, f64)>,
    /// Inclusive duration range (seconds)
    pub duration: Option<(f64, f64)>,
    /// Allowed keys
    pub keys: Option<BTreeSet<String>>,
    /// Allowed modes
    pub modes: Option<BTreeSet<String>>,
}

impl TrackFilter {
    /// Filter that accepts every row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn tempo_range(mut self, min: f64, max: f64) -> Self {
        self.tempo = Some((min, max));
        self
    }

    pub fn duration_range(mut self, min: f64, max: f64) -> Self {
        self.duration = Some((min, max));
        self
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = Some(modes.into_iter().map(Into::into).collect());
        self
    }

    /// Whether one row passes every criterion
    pub fn matches(&self, record: &FeatureRecord) -> bool {
        let missing = FeatureValue::Missing;
        let field = |name: &str| record.get(name).unwrap_or(&missing);

        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let found = field(SONG_NAME)
                .as_str()
                .map(|name| name.to_lowercase().contains(&term.to_lowercase()))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }

        in_range(field(TEMPO), self.tempo)
            && in_range(field(DURATION), self.duration)
            && in_set(field(KEY), self.keys.as_ref())
            && in_set(field(MODE), self.modes.as_ref())
    }

    /// Rows of `dataset` that pass the filter, in original order
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        let filtered = dataset.filter(|r| self.matches(r));
        debug!("Filter kept {} of {} rows", filtered.len(), dataset.len());
        filtered
    }
}

fn in_range(value: &FeatureValue, range: Option<(f64, f64)>) -> bool {
    match range {
        None => true,
        Some((min, max)) => value.as_f64().map(|v| v >= min && v <= max).unwrap_or(false),
    }
}

fn in_set(value: &FeatureValue, allowed: Option<&BTreeSet<String>>) -> bool {
    match allowed {
        None => true,
        Some(_) if value.is_missing() => false,
        Some(set) => set.contains(&value.to_cell()),
    }
}

/// Sorted distinct values of a categorical column
pub fn category_options(dataset: &Dataset, column: &str) -> Result<Vec<String>, AnalysisError> {
    let distinct: BTreeSet<String> = column_values(dataset, column)?
        .into_iter()
        .filter(|v| !v.is_missing())
        .map(FeatureValue::to_cell)
        .collect();
    Ok(distinct.into_iter().collect())
}

/// (min, max) of a numeric column, or None if it has no numeric values
pub fn numeric_range(dataset: &Dataset, column: &str) -> Result<Option<(f64, f64)>, AnalysisError> {
    let values = numeric_values(dataset, column)?;
    if values.is_empty() {
        return Ok(None);
    }
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    Ok(Some((min, max)))
}
