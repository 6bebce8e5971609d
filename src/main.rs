// Hawaii Climate API v0.1
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;
/// Minimum number of connections kept alive in the database pool.
const DB_POOL_MIN_CONNECTIONS: u32 = 1;

/// Hawaii Climate API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hawaii Climate API",
        version = "0.1.0",
        description = "Read-only access to historical precipitation and temperature \
            observations from Hawaiian weather stations. Aggregates are computed per \
            request from a fixed SQLite dataset.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Climate", description = "Precipitation and temperature aggregates"),
    ),
    paths(
        routes::health::health_check,
        routes::climate::index,
        routes::climate::get_precipitation,
        routes::climate::get_station_counts,
        routes::climate::get_tobs,
        routes::climate::get_start_stats,
        routes::climate::get_range_stats,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::climate::FailureResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hawaii_climate_api=debug,tower_http=debug".into());
    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Open the dataset read-only; nothing in this service writes to it
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("DATABASE_URL must be a valid sqlite connection string")
        .read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .min_connections(DB_POOL_MIN_CONNECTIONS)
        .connect_with(connect_options)
        .await
        .expect("Failed to open database");

    match db::queries::dataset_summary(&pool).await {
        Ok(summary) => {
            tracing::info!(
                "Loaded {} measurements from {} stations ({} .. {})",
                summary.measurement_count,
                summary.station_count,
                summary.first_date.as_deref().unwrap_or("-"),
                summary.last_date.as_deref().unwrap_or("-"),
            );
            if summary.measurement_count == 0 {
                tracing::warn!("Measurement table is empty; all aggregates will be empty");
            }
        }
        Err(e) => {
            tracing::error!("Failed to summarise dataset: {}", e);
        }
    }

    match db::queries::orphan_station_codes(&pool).await {
        Ok(orphans) if !orphans.is_empty() => {
            tracing::warn!(
                "{} measurement station code(s) have no station record: {}",
                orphans.len(),
                orphans.join(", ")
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to check station references: {}", e);
        }
    }

    let reference_cutoff_date = services::climate::resolve_reference_cutoff(
        &pool,
        config.reference_cutoff_date.as_deref(),
    )
    .await
    .expect("Failed to determine reference cutoff date");

    match &reference_cutoff_date {
        Some(cutoff) => tracing::info!("Recent-window queries start at {}", cutoff),
        None => tracing::warn!("No reference cutoff date; recent-window queries return nothing"),
    }

    let app_state = AppState {
        pool,
        reference_cutoff_date,
    };

    // CORS — read-only API, restrict methods to GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    let app = routes::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
