//! K-Means Track Clustering

use crate::scaler::StandardScaler;
use crate::{column_values, numeric_values, AnalysisError};
use feature_engine::Dataset;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Features clustered when none are selected
pub const DEFAULT_CLUSTER_FEATURES: &[&str] = &["tempo", "danceability", "loudness"];

const SEED: u64 = 42;
const MIN_CLUSTERS: usize = 2;
const MAX_CLUSTERS: usize = 6;

/// Clustering request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Numeric columns to cluster on
    pub features: Vec<String>,
    /// Number of clusters
    pub k: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            features: DEFAULT_CLUSTER_FEATURES.iter().map(|f| f.to_string()).collect(),
            k: 3,
        }
    }
}

/// Cluster label of one kept row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub song_name: String,
    /// Unscaled feature values, in `features` order
    pub values: Vec<f64>,
    pub cluster: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    pub features: Vec<String>,
    pub k: usize,
    pub assignments: Vec<ClusterAssignment>,
    /// Rows skipped for a missing or non-finite feature value
    pub dropped: usize,
}

impl ClusterResult {
    /// Number of rows in each cluster, indexed by label
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for a in &self.assignments {
            sizes[a.cluster] += 1;
        }
        sizes
    }
}

/// Standard-scale the selected features and run seeded k-means
pub fn cluster_tracks(dataset: &Dataset, config: &ClusterConfig) -> Result<ClusterResult, AnalysisError> {
    if config.features.is_empty() {
        return Err(AnalysisError::NoFeatures);
    }
    if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&config.k) {
        return Err(AnalysisError::OutOfRange {
            field: "k",
            value: config.k,
            min: MIN_CLUSTERS,
            max: MAX_CLUSTERS,
        });
    }

    let mut columns = Vec::with_capacity(config.features.len());
    for feature in &config.features {
        if numeric_values(dataset, feature)?.is_empty() {
            return Err(AnalysisError::NotNumeric(feature.clone()));
        }
        columns.push(column_values(dataset, feature)?);
    }

    let mut names = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, record) in dataset.records().iter().enumerate() {
        let row: Option<Vec<f64>> = columns
            .iter()
            .map(|c| c[i].as_f64().filter(|v| v.is_finite()))
            .collect();
        if let Some(row) = row {
            let name = record
                .get("song_name")
                .map(|v| v.to_cell())
                .unwrap_or_else(|| i.to_string());
            names.push(name);
            rows.push(row);
        }
    }
    let dropped = dataset.len() - rows.len();

    if rows.len() < config.k {
        return Err(AnalysisError::NotEnoughRows {
            required: config.k,
            actual: rows.len(),
        });
    }

    let width = config.features.len();
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    let raw = Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| AnalysisError::Clustering(e.to_string()))?;
    let (_, scaled) = StandardScaler::fit_transform(&raw)?;

    debug!(
        "Clustering {} rows on {:?} (k={}, {} dropped)",
        rows.len(),
        config.features,
        config.k,
        dropped
    );

    let rng = StdRng::seed_from_u64(SEED);
    let model = KMeans::params_with_rng(config.k, rng)
        .fit(&DatasetBase::from(scaled.clone()))
        .map_err(|e| AnalysisError::Clustering(e.to_string()))?;
    let labels: Array1<usize> = model.predict(&scaled);

    let assignments = names
        .into_iter()
        .zip(rows)
        .zip(labels.iter())
        .map(|((song_name, values), &cluster)| ClusterAssignment {
            song_name,
            values,
            cluster,
        })
        .collect();

    let result = ClusterResult {
        features: config.features.clone(),
        k: config.k,
        assignments,
        dropped,
    };
    info!("K-means assigned {} rows to {} clusters", result.assignments.len(), result.k);
    Ok(result)
}
