use sqlx::FromRow;

/// Average precipitation for one calendar date.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyPrecipitation {
    pub date: String,
    /// NULL when every reading on this date has no precipitation value.
    pub avg_prcp: Option<f64>,
}

/// One representative temperature reading per date, alongside that date's
/// average precipitation. `tobs` comes from the lowest-id row of the date.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyObservation {
    pub tobs: Option<f64>,
    pub avg_prcp: Option<f64>,
    pub date: String,
}

/// Min / max / mean temperature over a filtered set of rows.
/// All fields are NULL when no rows matched.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct TemperatureSummary {
    pub min_tobs: Option<f64>,
    pub max_tobs: Option<f64>,
    pub avg_tobs: Option<f64>,
}

/// Size and date span of the loaded dataset.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DatasetSummary {
    pub measurement_count: i64,
    pub station_count: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
