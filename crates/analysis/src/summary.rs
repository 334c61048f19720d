//! Descriptive Statistics

use crate::column_values;
use crate::AnalysisError;
use feature_engine::{Dataset, FeatureValue};
use serde::Serialize;
use std::collections::HashMap;

/// Statistics for a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Non-missing values
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (None for fewer than 2 values)
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Compute statistics from a slice of values (None if empty)
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std = if values.len() >= 2 {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            Some((m2 / (n - 1.0)).sqrt())
        } else {
            None
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            count: values.len(),
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Statistics for a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    /// Non-missing values
    pub count: usize,
    /// Distinct non-missing values
    pub unique: usize,
    /// Most frequent value (first seen wins ties)
    pub top: Option<String>,
    /// Occurrences of `top`
    pub freq: usize,
}

impl CategoricalSummary {
    fn compute(values: &[String]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for v in values {
            let c = counts.entry(v.as_str()).or_insert(0);
            if *c == 0 {
                order.push(v.as_str());
            }
            *c += 1;
        }

        let mut top: Option<(&str, usize)> = None;
        for name in &order {
            let c = counts[name];
            if top.map_or(true, |(_, best)| c > best) {
                top = Some((*name, c));
            }
        }

        Self {
            count: values.len(),
            unique: order.len(),
            top: top.map(|(name, _)| name.to_string()),
            freq: top.map(|(_, c)| c).unwrap_or(0),
        }
    }
}

/// Summary of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric { column: String, stats: NumericSummary },
    Categorical { column: String, stats: CategoricalSummary },
}

impl ColumnSummary {
    /// Column this summary describes
    pub fn column(&self) -> &str {
        match self {
            ColumnSummary::Numeric { column, .. } | ColumnSummary::Categorical { column, .. } => column,
        }
    }
}

/// Summarize every column of a dataset, in column order
///
/// A column is numeric when it has at least one value and all present values
/// are numbers; otherwise it is summarized as categorical.
pub fn summarize(dataset: &Dataset) -> Result<Vec<ColumnSummary>, AnalysisError> {
    let mut summaries = Vec::with_capacity(dataset.columns().len());
    for column in dataset.columns() {
        let present: Vec<&FeatureValue> = column_values(dataset, column)?
            .into_iter()
            .filter(|v| !v.is_missing())
            .collect();

        let numbers: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
        let numeric = numbers.len() == present.len();

        let summary = match NumericSummary::compute(&numbers).filter(|_| numeric) {
            Some(stats) => ColumnSummary::Numeric {
                column: column.clone(),
                stats,
            },
            None => {
                let labels: Vec<String> = present.iter().map(|v| v.to_cell()).collect();
                ColumnSummary::Categorical {
                    column: column.clone(),
                    stats: CategoricalSummary::compute(&labels),
                }
            }
        };
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Linear-interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::tracks;

    #[test]
    fn test_numeric_summary() {
        let stats = NumericSummary::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-9);
        assert!((stats.std.unwrap() - 2.138).abs() < 1e-3);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.median - 4.5).abs() < 1e-9);
        assert!((stats.q25 - 4.0).abs() < 1e-9);
        assert!((stats.q75 - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = NumericSummary::compute(&[3.0]).unwrap();
        assert_eq!(stats.std, None);
        assert_eq!(stats.median, 3.0);
        assert!(NumericSummary::compute(&[]).is_none());
    }

    #[test]
    fn test_summarize_classifies_columns() {
        let summaries = summarize(&tracks()).unwrap();
        assert_eq!(summaries.len(), 7);

        match &summaries[2] {
            ColumnSummary::Numeric { column, stats } => {
                assert_eq!(column, "tempo");
                assert_eq!(stats.count, 4);
            }
            other => panic!("tempo summarized as {:?}", other),
        }

        match &summaries[5] {
            ColumnSummary::Categorical { column, stats } => {
                assert_eq!(column, "key");
                assert_eq!(stats.count, 4);
                assert_eq!(stats.unique, 3);
                assert_eq!(stats.top.as_deref(), Some("C"));
                assert_eq!(stats.freq, 2);
            }
            other => panic!("key summarized as {:?}", other),
        }
    }

    #[test]
    fn test_summary_json_shape() {
        let summaries = summarize(&tracks()).unwrap();
        let json = serde_json::to_value(&summaries[6]).unwrap();
        assert_eq!(json["kind"], "categorical");
        assert_eq!(json["column"], "mode");
        assert_eq!(json["stats"]["top"], "major");
    }
}
