use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" when the dataset answers queries, "degraded" otherwise
    pub status: String,
    /// API version
    pub version: String,
    /// Number of measurement rows; null when the database is unreachable
    pub measurements: Option<i64>,
    /// First date of the recent-window queries; null for an empty dataset
    pub reference_cutoff_date: Option<String>,
}

/// Health check endpoint.
///
/// Counts measurement rows as the liveness probe for the dataset, and
/// reports the cutoff the precipitation and tobs routes are using.
/// Returns status "degraded" (still 200) if the count fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and dataset status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let measurements = match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM measurement")
        .fetch_one(&state.pool)
        .await
    {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check could not read the dataset: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: if measurements.is_some() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        measurements,
        reference_cutoff_date: state.reference_cutoff_date,
    })
}
