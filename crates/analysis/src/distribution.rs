//! Value Distributions

use crate::{column_values, numeric_values, AnalysisError};
use feature_engine::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bin count used when the caller gives none
pub const DEFAULT_BINS: usize = 10;
const MAX_BINS: usize = 200;

/// One equal-width bin; `end` is exclusive except for the last bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Values counted across all bins
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of a numeric column's present values
///
/// A column holding a single distinct value is binned over `value ± 0.5`.
pub fn histogram(dataset: &Dataset, column: &str, bins: usize) -> Result<Histogram, AnalysisError> {
    if !(1..=MAX_BINS).contains(&bins) {
        return Err(AnalysisError::OutOfRange {
            field: "bins",
            value: bins,
            min: 1,
            max: MAX_BINS,
        });
    }

    let values = numeric_values(dataset, column)?;
    if values.is_empty() {
        return Err(AnalysisError::NotNumeric(column.to_string()));
    }

    let mut lo = values.iter().cloned().fold(f64::MAX, f64::min);
    let mut hi = values.iter().cloned().fold(f64::MIN, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect();

    Ok(Histogram {
        column: column.to_string(),
        bins,
    })
}

/// Occurrences of one `(x, hue)` combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub hue: String,
    pub count: usize,
}

/// Count rows by `x` split by `hue`, sorted by value then hue
///
/// Rows missing either column are not counted.
pub fn category_counts(dataset: &Dataset, x: &str, hue: &str) -> Result<Vec<CategoryCount>, AnalysisError> {
    let xs = column_values(dataset, x)?;
    let hues = column_values(dataset, hue)?;

    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for (a, b) in xs.into_iter().zip(hues) {
        if a.is_missing() || b.is_missing() {
            continue;
        }
        *counts.entry((a.to_cell(), b.to_cell())).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((value, hue), count)| CategoryCount { value, hue, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::tracks;

    #[test]
    fn test_histogram_counts_every_present_value() {
        let h = histogram(&tracks(), "tempo", 4).unwrap();
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.total(), 4);
        assert_eq!(h.bins[0].start, 72.0);
        assert_eq!(h.bins[3].end, 128.0);
        // width 14: 72 | - | 100 | 126, 128
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 2]);
    }

    #[test]
    fn test_histogram_single_value() {
        let ds = tracks();
        let one = ds.filter(|r| r.get("song_name").and_then(|v| v.as_str()) == Some("ballad.wav"));
        let h = histogram(&one, "duration", 3).unwrap();
        assert_eq!(h.total(), 1);
        assert_eq!(h.bins[0].start, 239.5);
        assert_eq!(h.bins[2].end, 240.5);
    }

    #[test]
    fn test_histogram_rejects_bad_input() {
        let ds = tracks();
        assert!(matches!(histogram(&ds, "key", 10), Err(AnalysisError::NotNumeric(_))));
        assert!(matches!(histogram(&ds, "tempo", 0), Err(AnalysisError::OutOfRange { .. })));
        assert!(matches!(histogram(&ds, "nope", 10), Err(AnalysisError::UnknownColumn(_))));
    }

    #[test]
    fn test_key_by_mode_counts() {
        let counts = category_counts(&tracks(), "key", "mode").unwrap();
        let flat: Vec<(&str, &str, usize)> = counts
            .iter()
            .map(|c| (c.value.as_str(), c.hue.as_str(), c.count))
            .collect();
        assert_eq!(
            flat,
            vec![("A", "minor", 1), ("C", "major", 1), ("C", "minor", 1), ("F#", "major", 1)]
        );
    }
}
