//! Track Routes

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use analysis::{category_options, numeric_range, TrackFilter};
use feature_engine::{Dataset, FeatureRecord};
use serde::{Deserialize, Serialize};

use crate::{ApiError, SharedState};

/// Sidebar filter parameters shared by every dataset route
#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    /// Case-insensitive song name substring
    pub search: Option<String>,
    pub tempo_min: Option<f64>,
    pub tempo_max: Option<f64>,
    pub duration_min: Option<f64>,
    pub duration_max: Option<f64>,
    /// Comma-separated keys, e.g. `C,F#`
    pub keys: Option<String>,
    /// Comma-separated modes, e.g. `major`
    pub modes: Option<String>,
}

impl TrackQuery {
    /// Translate query parameters into a dataset filter
    pub fn to_filter(&self) -> TrackFilter {
        TrackFilter {
            search: self.search.clone(),
            tempo: range(self.tempo_min, self.tempo_max),
            duration: range(self.duration_min, self.duration_max),
            keys: list(self.keys.as_deref()),
            modes: list(self.modes.as_deref()),
        }
    }

    /// Apply the filter to a dataset
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        self.to_filter().apply(dataset)
    }
}

/// A half-open bound is unbounded on the missing side
fn range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY))),
    }
}

fn list<T: FromIterator<String>>(raw: Option<&str>) -> Option<T> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items.into_iter().collect())
    }
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub data: Vec<FeatureRecord>,
    /// Rows after filtering
    pub count: usize,
    /// Rows in the dataset
    pub total: usize,
}

/// Filtered rows as JSON
pub async fn get_tracks(
    State(state): State<SharedState>,
    Query(params): Query<TrackQuery>,
) -> Json<TracksResponse> {
    let state = state.read().await;
    let filtered = params.apply(&state.dataset);

    Json(TracksResponse {
        count: filtered.len(),
        total: state.dataset.len(),
        data: filtered.records().to_vec(),
    })
}

/// Filtered rows as a CSV download
pub async fn get_tracks_csv(
    State(state): State<SharedState>,
    Query(params): Query<TrackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state.read().await;
    let filtered = params.apply(&state.dataset);

    let mut body = Vec::new();
    storage::write_dataset(&filtered, &mut body)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"filtered_tracks.csv\""),
        ],
        body,
    ))
}

/// Sidebar defaults: value ranges and category options
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub tempo: Option<(f64, f64)>,
    pub duration: Option<(f64, f64)>,
    pub keys: Vec<String>,
    pub modes: Vec<String>,
}

pub async fn get_filters(State(state): State<SharedState>) -> Result<Json<FiltersResponse>, ApiError> {
    let state = state.read().await;
    let ds = &state.dataset;

    let range_of = |column: &str| -> Result<Option<(f64, f64)>, ApiError> {
        if ds.has_column(column) {
            Ok(numeric_range(ds, column)?)
        } else {
            Ok(None)
        }
    };
    let options_of = |column: &str| -> Result<Vec<String>, ApiError> {
        if ds.has_column(column) {
            Ok(category_options(ds, column)?)
        } else {
            Ok(Vec::new())
        }
    };

    Ok(Json(FiltersResponse {
        tempo: range_of("tempo")?,
        duration: range_of("duration")?,
        keys: options_of("key")?,
        modes: options_of("mode")?,
    }))
}
