//! Query service over the observation dataset.
//!
//! Four read-only aggregates back the public routes. Two of them are limited
//! to the most recent twelve months of data, measured back from the latest
//! measurement date (`reference_cutoff_date`).

use chrono::{Months, NaiveDate};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::db::models::{DailyObservation, TemperatureSummary};
use crate::db::queries;
use crate::errors::AppError;

/// Length of the "recent" window used by the precipitation and tobs routes.
const RECENT_WINDOW_MONTHS: u32 = 12;

/// Date format of `measurement.date`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which rows a temperature summary covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    /// Rows dated exactly this string.
    On(String),
    /// Rows dated `start..=end`, compared as strings.
    Between { start: String, end: String },
}

impl DateFilter {
    pub fn from_path(start: String, end: Option<String>) -> Self {
        match end {
            Some(end) => DateFilter::Between { start, end },
            None => DateFilter::On(start),
        }
    }
}

/// Subtract the recent window from the latest recorded date.
///
/// Month arithmetic clamps to the last valid day, so a leap day maps to
/// February 28th of the previous year.
pub fn cutoff_from_latest(latest: &str) -> Result<String, AppError> {
    let latest_date = NaiveDate::parse_from_str(latest, DATE_FORMAT).map_err(|e| {
        AppError::Config(format!(
            "latest measurement date '{}' is not YYYY-MM-DD: {}",
            latest, e
        ))
    })?;
    let cutoff = latest_date
        .checked_sub_months(Months::new(RECENT_WINDOW_MONTHS))
        .ok_or_else(|| {
            AppError::Config(format!("cannot go back a year from '{}'", latest))
        })?;
    Ok(cutoff.format(DATE_FORMAT).to_string())
}

/// Resolve the cutoff date once at startup.
///
/// An explicit override wins; otherwise it is derived from `max(date)`.
/// Returns `None` for an empty dataset.
pub async fn resolve_reference_cutoff(
    pool: &SqlitePool,
    override_date: Option<&str>,
) -> Result<Option<String>, AppError> {
    if let Some(date) = override_date {
        NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
            AppError::Config(format!(
                "REFERENCE_CUTOFF_DATE '{}' is not YYYY-MM-DD: {}",
                date, e
            ))
        })?;
        return Ok(Some(date.to_string()));
    }

    match queries::latest_measurement_date(pool).await? {
        Some(latest) => cutoff_from_latest(&latest).map(Some),
        None => Ok(None),
    }
}

/// Average precipitation per date since the cutoff. A date whose readings
/// all lack precipitation maps to `None`.
pub async fn precipitation_by_date(
    pool: &SqlitePool,
    cutoff: Option<&str>,
) -> Result<BTreeMap<String, Option<f64>>, AppError> {
    let Some(cutoff) = cutoff else {
        return Ok(BTreeMap::new());
    };
    let rows = queries::daily_precipitation_since(pool, cutoff).await?;
    Ok(rows.into_iter().map(|r| (r.date, r.avg_prcp)).collect())
}

/// Row count for each station, ordered by station code. The codes
/// themselves are not returned.
pub async fn station_counts(pool: &SqlitePool) -> Result<Vec<i64>, AppError> {
    Ok(queries::station_counts(pool).await?)
}

/// One `(tobs, avg_prcp, date)` entry per date since the cutoff.
pub async fn recent_temperature_observations(
    pool: &SqlitePool,
    cutoff: Option<&str>,
) -> Result<Vec<DailyObservation>, AppError> {
    let Some(cutoff) = cutoff else {
        return Ok(Vec::new());
    };
    Ok(queries::daily_observations_since(pool, cutoff).await?)
}

/// Min / max / mean temperature for a date or an inclusive date range.
/// No matching rows yields an all-`None` summary, not an error.
pub async fn temperature_stats(
    pool: &SqlitePool,
    filter: &DateFilter,
) -> Result<TemperatureSummary, AppError> {
    let summary = match filter {
        DateFilter::On(date) => queries::temperature_summary_on(pool, date).await?,
        DateFilter::Between { start, end } => {
            queries::temperature_summary_between(pool, start, end).await?
        }
    };
    Ok(summary)
}
