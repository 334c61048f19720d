//! Feature Standardization

use crate::AnalysisError;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

/// Per-feature z-score scaler
///
/// Fitted statistics use the population standard deviation. Features with zero
/// variance transform to 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std_dev: Vec<f64>,
}

impl StandardScaler {
    /// Learn mean and deviation of every column of `data` (rows are samples)
    pub fn fit(data: &Array2<f64>) -> Result<Self, AnalysisError> {
        if data.nrows() == 0 {
            return Err(AnalysisError::NotEnoughRows {
                required: 1,
                actual: 0,
            });
        }

        let mut mean = Vec::with_capacity(data.ncols());
        let mut std_dev = Vec::with_capacity(data.ncols());
        for column in data.axis_iter(Axis(1)) {
            let n = column.len() as f64;
            let m = column.sum() / n;
            let variance = column.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;
            mean.push(m);
            std_dev.push(variance.sqrt());
        }

        Ok(Self { mean, std_dev })
    }

    /// Scale `data` with the fitted statistics
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, AnalysisError> {
        if data.ncols() != self.mean.len() {
            return Err(AnalysisError::ShapeMismatch {
                expected: self.mean.len(),
                actual: data.ncols(),
            });
        }

        let mut scaled = data.clone();
        for (j, mut column) in scaled.axis_iter_mut(Axis(1)).enumerate() {
            let (m, s) = (self.mean[j], self.std_dev[j]);
            column.mapv_inplace(|v| if s > 0.0 { (v - m) / s } else { 0.0 });
        }
        Ok(scaled)
    }

    pub fn fit_transform(data: &Array2<f64>) -> Result<(Self, Array2<f64>), AnalysisError> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }

    /// Fitted means
    pub fn mean(&self) -> Array1<f64> {
        Array1::from(self.mean.clone())
    }

    /// Fitted population standard deviations
    pub fn std_dev(&self) -> Array1<f64> {
        Array1::from(self.std_dev.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zscore_columns() {
        let data = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&data).unwrap();

        assert_eq!(scaler.mean(), array![2.0, 10.0]);
        let s = (2.0f64 / 3.0).sqrt();
        assert!((scaled[[0, 0]] + 1.0 / s).abs() < 1e-12);
        assert!(scaled[[1, 0]].abs() < 1e-12);
        assert!((scaled[[2, 0]] - 1.0 / s).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_maps_to_zero() {
        let data = array![[5.0], [5.0]];
        let (_, scaled) = StandardScaler::fit_transform(&data).unwrap();
        assert_eq!(scaled, array![[0.0], [0.0]]);
    }

    #[test]
    fn test_shape_checks() {
        let scaler = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(matches!(
            scaler.transform(&array![[1.0, 2.0, 3.0]]),
            Err(AnalysisError::ShapeMismatch { expected: 2, actual: 3 })
        ));
        assert!(StandardScaler::fit(&Array2::zeros((0, 2))).is_err());
    }
}
