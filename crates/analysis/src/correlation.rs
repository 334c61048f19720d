//! Pearson Correlation

use crate::{column_values, AnalysisError};
use feature_engine::Dataset;
use serde::Serialize;

/// Square correlation matrix over numeric columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`; None when undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Columns whose present values are all numbers (and that have at least one)
pub fn numeric_columns(dataset: &Dataset) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .filter(|name| {
            let values = dataset.column(name).unwrap_or_default();
            let mut present = values.iter().filter(|v| !v.is_missing()).peekable();
            present.peek().is_some() && present.all(|v| v.as_f64().is_some())
        })
        .cloned()
        .collect()
}

/// Pairwise-complete Pearson correlation of every numeric column
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix, AnalysisError> {
    if dataset.len() < 2 {
        return Err(AnalysisError::NotEnoughRows {
            required: 2,
            actual: dataset.len(),
        });
    }

    let columns = numeric_columns(dataset);
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in &columns {
        data.push(column_values(dataset, name)?.into_iter().map(|v| v.as_f64()).collect());
    }

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

/// Pearson coefficient over rows where both values are present
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::tracks;

    #[test]
    fn test_numeric_columns_skip_text() {
        assert_eq!(
            numeric_columns(&tracks()),
            vec!["duration", "tempo", "danceability", "loudness"]
        );
    }

    #[test]
    fn test_pearson_basic() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0)];
        let down = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        let constant = [Some(5.0), Some(5.0), Some(5.0)];
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&x, &constant), None);

        let sparse = [Some(1.0), None, None];
        assert_eq!(pearson(&x, &sparse), None);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let m = correlation_matrix(&tracks()).unwrap();
        assert_eq!(m.columns.len(), 4);
        for i in 0..4 {
            assert!((m.values[i][i].unwrap() - 1.0).abs() < 1e-12);
            for j in 0..4 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        // danceability and loudness move together in the fixture
        assert!(m.get("danceability", "loudness").unwrap() > 0.9);
        assert_eq!(m.get("danceability", "key"), None);
    }

    #[test]
    fn test_requires_two_rows() {
        let ds = tracks();
        let one = ds.filter(|r| r.get("song_name").and_then(|v| v.as_str()) == Some("ballad.wav"));
        assert!(matches!(
            correlation_matrix(&one),
            Err(AnalysisError::NotEnoughRows { required: 2, actual: 1 })
        ));
    }
}
