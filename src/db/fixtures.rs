//! In-memory SQLite datasets for tests.
//!
//! The seeded dataset spans 2016-08-22 to 2017-08-23, so the derived cutoff
//! is 2016-08-23 and exactly one row (id 1) falls before it.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

const SCHEMA: [&str; 2] = [
    "CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        date TEXT,
        station TEXT,
        prcp FLOAT,
        tobs FLOAT
    )",
    "CREATE TABLE station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    )",
];

const STATIONS: [(i64, &str, &str, f64, f64, f64); 3] = [
    (1, "USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
    (2, "USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
    (3, "USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
];

/// (id, date, station, prcp, tobs). USC00517948 has no station row.
const MEASUREMENTS: [(i64, &str, &str, Option<f64>, f64); 11] = [
    (1, "2016-08-22", "USC00519397", Some(0.10), 75.0),
    (2, "2016-08-23", "USC00519397", Some(0.00), 81.0),
    (3, "2016-08-23", "USC00513117", Some(0.15), 76.0),
    (4, "2016-08-23", "USC00519281", Some(1.79), 77.0),
    (5, "2017-01-01", "USC00519397", Some(0.00), 62.0),
    (6, "2017-01-01", "USC00513117", None, 66.0),
    (7, "2017-01-02", "USC00519397", Some(0.00), 63.0),
    (8, "2017-01-03", "USC00519281", Some(0.29), 70.0),
    (9, "2017-08-23", "USC00519397", None, 81.0),
    (10, "2017-08-23", "USC00513117", None, 82.0),
    (11, "2017-08-22", "USC00517948", Some(0.45), 79.0),
];

/// Single-connection pool so every query sees the same in-memory database.
async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("schema should apply");
    }
    pool
}

/// Both tables present, no rows.
pub(crate) async fn empty_pool() -> SqlitePool {
    memory_pool().await
}

/// Small Hawaii-shaped dataset; see `MEASUREMENTS` for the exact rows.
pub(crate) async fn seeded_pool() -> SqlitePool {
    let pool = memory_pool().await;

    for (id, code, name, lat, lon, elevation) in STATIONS {
        sqlx::query(
            "INSERT INTO station (id, station, name, latitude, longitude, elevation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .bind(lat)
        .bind(lon)
        .bind(elevation)
        .execute(&pool)
        .await
        .expect("station insert");
    }

    for (id, date, station, prcp, tobs) in MEASUREMENTS {
        sqlx::query(
            "INSERT INTO measurement (id, date, station, prcp, tobs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(date)
        .bind(station)
        .bind(prcp)
        .bind(tobs)
        .execute(&pool)
        .await
        .expect("measurement insert");
    }

    pool
}
