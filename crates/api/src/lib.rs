//! Music Features API Server
//!
//! Serves the extracted dataset to the dashboard: filtered track tables, CSV
//! export, summary statistics and clustering.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use feature_engine::Dataset;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod config;
mod error;
pub mod pipeline;
mod routes;

pub use config::{AppConfig, ConfigError, ExtractorKind};
pub use error::ApiError;
pub use pipeline::run_extract;

/// Application state shared across handlers
pub struct AppState {
    /// Dataset currently served
    pub dataset: Dataset,
    /// CSV the dataset was loaded from, if any
    pub source: Option<PathBuf>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Serve an in-memory dataset
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            source: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Serve the dataset stored in a CSV file
    pub fn from_csv(path: &Path) -> Result<Self, storage::StorageError> {
        let dataset = storage::load_dataset(path)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..Self::new(dataset)
        })
    }

    /// Re-read the source CSV; returns the new row count
    pub fn reload(&mut self) -> Result<usize, ApiError> {
        let path = self
            .source
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("Dataset was not loaded from a file".to_string()))?;
        self.dataset = storage::load_dataset(path)?;
        info!("Reloaded {} rows from {}", self.dataset.len(), path.display());
        Ok(self.dataset.len())
    }
}

pub type SharedState = Arc<RwLock<AppState>>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub rows: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub rows: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/reload", post(reload_handler))
        .route("/api/v1/tracks", get(routes::tracks::get_tracks))
        .route("/api/v1/tracks.csv", get(routes::tracks::get_tracks_csv))
        .route("/api/v1/filters", get(routes::tracks::get_filters))
        .route("/api/v1/summary", get(routes::analytics::get_summary))
        .route("/api/v1/correlation", get(routes::analytics::get_correlation))
        .route("/api/v1/histogram", get(routes::analytics::get_histogram))
        .route("/api/v1/key-distribution", get(routes::analytics::get_key_distribution))
        .route("/api/v1/clusters", get(routes::analytics::get_clusters))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let state = state.read().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rows: state.dataset.len(),
        columns: state.dataset.columns().to_vec(),
    })
}

async fn reload_handler(State(state): State<SharedState>) -> Result<Json<ReloadResponse>, ApiError> {
    let mut state = state.write().await;
    let rows = state.reload()?;
    Ok(Json(ReloadResponse { rows }))
}

/// Initialize logging; `RUST_LOG` takes precedence over `default_level`
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Serve the configured dataset until interrupted
pub async fn run_server(config: &AppConfig) -> Result<()> {
    let state = AppState::from_csv(&config.output_csv)
        .with_context(|| format!("Failed to load dataset {}", config.output_csv.display()))?;
    info!(
        "Loaded {} rows from {}",
        state.dataset.len(),
        config.output_csv.display()
    );

    let app = create_router(Arc::new(RwLock::new(state)));

    info!("Starting API server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
