/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string for the observation dataset (opened read-only).
    pub database_url: String,
    pub port: u16,
    /// Overrides the cutoff derived from the latest measurement date.
    pub reference_cutoff_date: Option<String>,
    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://Resources/hawaii.sqlite".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            reference_cutoff_date: std::env::var("REFERENCE_CUTOFF_DATE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}
