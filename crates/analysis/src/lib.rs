//! Dataset Analysis
//!
//! Filtering, descriptive statistics and clustering used by the dashboard.

mod clustering;
mod correlation;
mod distribution;
mod error;
mod filter;
mod scaler;
mod summary;

pub use clustering::{
    cluster_tracks, ClusterAssignment, ClusterConfig, ClusterResult, DEFAULT_CLUSTER_FEATURES,
};
pub use correlation::{correlation_matrix, numeric_columns, CorrelationMatrix};
pub use distribution::{category_counts, histogram, CategoryCount, Histogram, HistogramBin, DEFAULT_BINS};
pub use error::AnalysisError;
pub use filter::{category_options, numeric_range, TrackFilter};
pub use scaler::StandardScaler;
pub use summary::{summarize, ColumnSummary, NumericSummary, CategoricalSummary};

use feature_engine::{Dataset, FeatureValue};

/// Values of one column, failing on unknown names
pub(crate) fn column_values<'a>(
    dataset: &'a Dataset,
    name: &str,
) -> Result<Vec<&'a FeatureValue>, AnalysisError> {
    dataset
        .column(name)
        .ok_or_else(|| AnalysisError::UnknownColumn(name.to_string()))
}

/// Present numeric values of one column
pub(crate) fn numeric_values(dataset: &Dataset, name: &str) -> Result<Vec<f64>, AnalysisError> {
    Ok(column_values(dataset, name)?
        .into_iter()
        .filter_map(FeatureValue::as_f64)
        .collect())
}
