use axum::extract::FromRef;
use axum::http::Uri;
use axum::{routing::get, Router};
use sqlx::SqlitePool;

use crate::errors::AppError;

pub mod climate;
pub mod health;

/// Shared application state. Immutable once the server starts.
#[derive(Clone, FromRef)]
pub(crate) struct AppState {
    pub(crate) pool: SqlitePool,
    /// Start of the "most recent twelve months" window; `None` for an empty dataset.
    pub(crate) reference_cutoff_date: Option<String>,
}

/// All API routes. Static segments take precedence over the `:start` route,
/// so `/api/v1.0/stations` never reaches the date handler.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(climate::index))
        .route("/api/v1.0/precipitation", get(climate::get_precipitation))
        .route("/api/v1.0/stations", get(climate::get_station_counts))
        .route("/api/v1.0/tobs", get(climate::get_tobs))
        .route("/api/v1.0/:start", get(climate::get_start_stats))
        .route("/api/v1.0/:start/:end", get(climate::get_range_stats))
        .route("/health", get(health::health_check))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
