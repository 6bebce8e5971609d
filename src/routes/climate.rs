//! Observation HTTP endpoints.
//!
//! - GET /api/v1.0/precipitation
//! - GET /api/v1.0/stations
//! - GET /api/v1.0/tobs
//! - GET /api/v1.0/:start
//! - GET /api/v1.0/:start/:end

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::AppState;
use crate::db::models::{DailyObservation, TemperatureSummary};
use crate::errors::{AppError, ErrorResponse};
use crate::services::climate::{self, DateFilter};

/// Plain-text route listing served at `/`.
pub const ROUTE_LISTING: &str = "Aloha and welcome to Hawaii!\n\
\n\
Available Routes:\n\
/api/v1.0/precipitation\n\
/api/v1.0/stations\n\
/api/v1.0/tobs\n\
/api/v1.0/<start>\n\
/api/v1.0/<start>/<end>\n";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// `[tobs, avg_prcp, date]` for one date.
#[derive(Debug, Serialize, PartialEq)]
pub struct ObservationRow(pub Option<f64>, pub Option<f64>, pub String);

impl From<DailyObservation> for ObservationRow {
    fn from(o: DailyObservation) -> Self {
        Self(o.tobs, o.avg_prcp, o.date)
    }
}

/// `[min, max, avg]` temperature; all null when no rows matched.
#[derive(Debug, Serialize, PartialEq)]
pub struct TemperatureStatsRow(pub Option<f64>, pub Option<f64>, pub Option<f64>);

impl From<TemperatureSummary> for TemperatureStatsRow {
    fn from(s: TemperatureSummary) -> Self {
        Self(s.min_tobs, s.max_tobs, s.avg_tobs)
    }
}

/// Body returned by the date routes when the path cannot be decoded or the
/// query itself fails. Sent with status 200 so existing clients keep parsing it.
#[derive(Debug, Serialize, ToSchema)]
pub struct FailureResponse {
    /// Always "failure"
    pub status: String,
    /// Error message from the failed query
    pub error: String,
}

impl FailureResponse {
    fn new(error: String) -> Self {
        Self {
            status: "failure".to_string(),
            error,
        }
    }
}

impl From<AppError> for FailureResponse {
    fn from(err: AppError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<PathRejection> for FailureResponse {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.body_text())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List the available routes.
#[utoipa::path(
    get,
    path = "/",
    tag = "Climate",
    responses(
        (status = 200, description = "Route listing", body = String, content_type = "text/plain"),
    )
)]
pub async fn index() -> &'static str {
    ROUTE_LISTING
}

/// Average precipitation per date over the most recent twelve months.
///
/// Dates whose readings all lack a precipitation value map to null.
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "Climate",
    responses(
        (status = 200, description = "Map of date to average precipitation", body = BTreeMap<String, f64>),
        (status = 500, description = "Database error", body = ErrorResponse),
    )
)]
pub async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, AppError> {
    let by_date =
        climate::precipitation_by_date(&state.pool, state.reference_cutoff_date.as_deref())
            .await?;
    Ok(Json(by_date))
}

/// Number of measurements recorded by each station, ordered by station code.
#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "Climate",
    responses(
        (status = 200, description = "Row count per station", body = Vec<i64>),
        (status = 500, description = "Database error", body = ErrorResponse),
    )
)]
pub async fn get_station_counts(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<i64>>, AppError> {
    Ok(Json(climate::station_counts(&pool).await?))
}

/// One temperature observation per date over the most recent twelve months,
/// with that date's average precipitation.
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "Climate",
    responses(
        (status = 200, description = "List of [tobs, avg_prcp, date]", body = Vec<Vec<serde_json::Value>>),
        (status = 500, description = "Database error", body = ErrorResponse),
    )
)]
pub async fn get_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ObservationRow>>, AppError> {
    let rows = climate::recent_temperature_observations(
        &state.pool,
        state.reference_cutoff_date.as_deref(),
    )
    .await?;
    Ok(Json(rows.into_iter().map(ObservationRow::from).collect()))
}

/// Min, max and average temperature on exactly one date.
///
/// `start` is matched literally against stored dates; it is not the start
/// of an open-ended range.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "Climate",
    params(
        ("start" = String, Path, description = "Date as YYYY-MM-DD"),
    ),
    responses(
        (status = 200, description = "[[min, max, avg]], or a failure body if the path is undecodable or the query failed", body = Vec<Vec<serde_json::Value>>),
    )
)]
pub async fn get_start_stats(
    State(pool): State<SqlitePool>,
    start: Result<Path<String>, PathRejection>,
) -> Response {
    match start {
        Ok(Path(start)) => stats_response(&pool, DateFilter::from_path(start, None)).await,
        Err(rejection) => path_failure(rejection),
    }
}

/// Min, max and average temperature over an inclusive date range.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "Climate",
    params(
        ("start" = String, Path, description = "First date, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date, YYYY-MM-DD (inclusive)"),
    ),
    responses(
        (status = 200, description = "[[min, max, avg]], or a failure body if the path is undecodable or the query failed", body = Vec<Vec<serde_json::Value>>),
    )
)]
pub async fn get_range_stats(
    State(pool): State<SqlitePool>,
    range: Result<Path<(String, String)>, PathRejection>,
) -> Response {
    match range {
        Ok(Path((start, end))) => {
            stats_response(&pool, DateFilter::from_path(start, Some(end))).await
        }
        Err(rejection) => path_failure(rejection),
    }
}

fn path_failure(rejection: PathRejection) -> Response {
    tracing::warn!("Rejected date path: {}", rejection.body_text());
    Json(FailureResponse::from(rejection)).into_response()
}

async fn stats_response(pool: &SqlitePool, filter: DateFilter) -> Response {
    match climate::temperature_stats(pool, &filter).await {
        Ok(summary) => Json(vec![TemperatureStatsRow::from(summary)]).into_response(),
        Err(e) => {
            tracing::warn!("Temperature stats for {:?} failed: {}", filter, e);
            Json(FailureResponse::from(e)).into_response()
        }
    }
}
