//! Analytics Routes

use analysis::{
    category_counts, cluster_tracks, correlation_matrix, histogram, summarize, CategoryCount, ClusterConfig,
    ClusterResult, ColumnSummary, CorrelationMatrix, Histogram, DEFAULT_BINS,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::tracks::TrackQuery;
use crate::{ApiError, SharedState};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Per-column statistics of the filtered rows
pub async fn get_summary(
    State(state): State<SharedState>,
    Query(filter): Query<TrackQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let state = state.read().await;
    let filtered = filter.apply(&state.dataset);
    Ok(Json(SummaryResponse {
        rows: filtered.len(),
        columns: summarize(&filtered)?,
    }))
}

/// Pearson correlation of the filtered rows' numeric columns
pub async fn get_correlation(
    State(state): State<SharedState>,
    Query(filter): Query<TrackQuery>,
) -> Result<Json<CorrelationMatrix>, ApiError> {
    let state = state.read().await;
    let filtered = filter.apply(&state.dataset);
    Ok(Json(correlation_matrix(&filtered)?))
}

#[derive(Debug, Deserialize)]
pub struct HistogramQuery {
    #[serde(default = "default_column")]
    pub column: String,
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_column() -> String {
    "tempo".to_string()
}

fn default_bins() -> usize {
    DEFAULT_BINS
}

pub async fn get_histogram(
    State(state): State<SharedState>,
    Query(filter): Query<TrackQuery>,
    Query(params): Query<HistogramQuery>,
) -> Result<Json<Histogram>, ApiError> {
    let state = state.read().await;
    let filtered = filter.apply(&state.dataset);
    Ok(Json(histogram(&filtered, &params.column, params.bins)?))
}

/// Key counts split by mode
pub async fn get_key_distribution(
    State(state): State<SharedState>,
    Query(filter): Query<TrackQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let state = state.read().await;
    let filtered = filter.apply(&state.dataset);
    Ok(Json(category_counts(&filtered, "key", "mode")?))
}

#[derive(Debug, Deserialize)]
pub struct ClusterQuery {
    /// Comma-separated feature columns
    pub features: Option<String>,
    pub k: Option<usize>,
}

impl ClusterQuery {
    fn to_config(&self) -> ClusterConfig {
        let mut config = ClusterConfig::default();
        if let Some(raw) = self.features.as_deref() {
            config.features = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        config
    }
}

/// K-means cluster labels for the filtered rows
pub async fn get_clusters(
    State(state): State<SharedState>,
    Query(filter): Query<TrackQuery>,
    Query(params): Query<ClusterQuery>,
) -> Result<Json<ClusterResult>, ApiError> {
    let state = state.read().await;
    let filtered = filter.apply(&state.dataset);
    Ok(Json(cluster_tracks(&filtered, &params.to_config())?))
}
