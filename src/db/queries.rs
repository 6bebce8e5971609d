use sqlx::SqlitePool;

use super::models::{DailyObservation, DailyPrecipitation, DatasetSummary, TemperatureSummary};

/// Latest measurement date in the dataset, or `None` when the table is empty.
pub async fn latest_measurement_date(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
        .fetch_one(pool)
        .await
}

/// Row counts and date span, used for the startup summary.
pub async fn dataset_summary(pool: &SqlitePool) -> Result<DatasetSummary, sqlx::Error> {
    sqlx::query_as::<_, DatasetSummary>(
        "SELECT (SELECT COUNT(*) FROM measurement) AS measurement_count,
                (SELECT COUNT(*) FROM station) AS station_count,
                (SELECT MIN(date) FROM measurement) AS first_date,
                (SELECT MAX(date) FROM measurement) AS last_date",
    )
    .fetch_one(pool)
    .await
}

/// Station codes used by measurements that have no row in the station table.
pub async fn orphan_station_codes(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT m.station
         FROM measurement AS m
         WHERE m.station IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM station AS s WHERE s.station = m.station)
         ORDER BY m.station",
    )
    .fetch_all(pool)
    .await
}

/// Average precipitation per date on or after `cutoff`, nulls excluded.
pub async fn daily_precipitation_since(
    pool: &SqlitePool,
    cutoff: &str,
) -> Result<Vec<DailyPrecipitation>, sqlx::Error> {
    sqlx::query_as::<_, DailyPrecipitation>(
        "SELECT date, AVG(prcp) AS avg_prcp
         FROM measurement
         WHERE date >= ?1
         GROUP BY date
         ORDER BY date",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

/// Row count per station, ordered by station code. Codes are not returned.
pub async fn station_counts(pool: &SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)
         FROM measurement
         GROUP BY station
         ORDER BY station",
    )
    .fetch_all(pool)
    .await
}

/// One observation per date on or after `cutoff`, ordered by date.
///
/// `tobs` is not aggregated, so the lowest-id row of each date supplies it;
/// SQLite's bare-column choice in a GROUP BY is not stable across versions.
pub async fn daily_observations_since(
    pool: &SqlitePool,
    cutoff: &str,
) -> Result<Vec<DailyObservation>, sqlx::Error> {
    sqlx::query_as::<_, DailyObservation>(
        "SELECT (SELECT CAST(rep.tobs AS REAL)
                 FROM measurement AS rep
                 WHERE rep.date = m.date
                 ORDER BY rep.id
                 LIMIT 1) AS tobs,
                AVG(m.prcp) AS avg_prcp,
                m.date AS date
         FROM measurement AS m
         WHERE m.date >= ?1
         GROUP BY m.date
         ORDER BY m.date",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

/// Temperature min/max/avg over rows dated exactly `date`.
pub async fn temperature_summary_on(
    pool: &SqlitePool,
    date: &str,
) -> Result<TemperatureSummary, sqlx::Error> {
    sqlx::query_as::<_, TemperatureSummary>(
        "SELECT CAST(MIN(tobs) AS REAL) AS min_tobs,
                CAST(MAX(tobs) AS REAL) AS max_tobs,
                AVG(tobs) AS avg_tobs
         FROM measurement
         WHERE date = ?1",
    )
    .bind(date)
    .fetch_one(pool)
    .await
}

/// Temperature min/max/avg over rows dated `start..=end` (string comparison).
pub async fn temperature_summary_between(
    pool: &SqlitePool,
    start: &str,
    end: &str,
) -> Result<TemperatureSummary, sqlx::Error> {
    sqlx::query_as::<_, TemperatureSummary>(
        "SELECT CAST(MIN(tobs) AS REAL) AS min_tobs,
                CAST(MAX(tobs) AS REAL) AS max_tobs,
                AVG(tobs) AS avg_tobs
         FROM measurement
         WHERE date >= ?1 AND date <= ?2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{empty_pool, seeded_pool};

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[tokio::test]
    async fn test_latest_measurement_date() {
        let pool = seeded_pool().await;
        let latest = latest_measurement_date(&pool).await.unwrap();
        assert_eq!(latest.as_deref(), Some("2017-08-23"));
    }

    #[tokio::test]
    async fn test_latest_measurement_date_empty_table() {
        let pool = empty_pool().await;
        assert_eq!(latest_measurement_date(&pool).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dataset_summary() {
        let pool = seeded_pool().await;
        let summary = dataset_summary(&pool).await.unwrap();
        assert_eq!(summary.measurement_count, 11);
        assert_eq!(summary.station_count, 3);
        assert_eq!(summary.first_date.as_deref(), Some("2016-08-22"));
        assert_eq!(summary.last_date.as_deref(), Some("2017-08-23"));
    }

    #[tokio::test]
    async fn test_orphan_station_codes() {
        let pool = seeded_pool().await;
        let orphans = orphan_station_codes(&pool).await.unwrap();
        assert_eq!(orphans, vec!["USC00517948".to_string()]);
    }

    #[tokio::test]
    async fn test_daily_precipitation_excludes_rows_before_cutoff() {
        let pool = seeded_pool().await;
        let rows = daily_precipitation_since(&pool, "2016-08-23").await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2016-08-23",
                "2017-01-01",
                "2017-01-02",
                "2017-01-03",
                "2017-08-22",
                "2017-08-23"
            ]
        );
        assert!(approx(rows[0].avg_prcp, (0.0 + 0.15 + 1.79) / 3.0));
    }

    #[tokio::test]
    async fn test_daily_precipitation_ignores_nulls() {
        let pool = seeded_pool().await;
        let rows = daily_precipitation_since(&pool, "2017-01-01").await.unwrap();
        // 2017-01-01 has one 0.00 reading and one NULL reading
        assert!(approx(rows[0].avg_prcp, 0.0));
        // 2017-08-23 has only NULL readings
        let last = rows.last().unwrap();
        assert_eq!(last.date, "2017-08-23");
        assert_eq!(last.avg_prcp, None);
    }

    #[tokio::test]
    async fn test_station_counts_sum_to_total() {
        let pool = seeded_pool().await;
        let counts = station_counts(&pool).await.unwrap();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts.iter().sum::<i64>(), 11);
        // USC00513117 sorts first and has three rows
        assert_eq!(counts[0], 3);
    }

    #[tokio::test]
    async fn test_daily_observations_pick_lowest_id_row() {
        let pool = seeded_pool().await;
        let rows = daily_observations_since(&pool, "2016-08-23").await.unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].date, "2016-08-23");
        assert_eq!(rows[0].tobs, Some(81.0));
        assert_eq!(rows[5].date, "2017-08-23");
        assert_eq!(rows[5].tobs, Some(81.0));
        assert_eq!(rows[5].avg_prcp, None);
    }

    #[tokio::test]
    async fn test_temperature_summary_on_exact_date() {
        let pool = seeded_pool().await;
        let stats = temperature_summary_on(&pool, "2017-01-01").await.unwrap();
        assert_eq!(stats.min_tobs, Some(62.0));
        assert_eq!(stats.max_tobs, Some(66.0));
        assert!(approx(stats.avg_tobs, 64.0));
    }

    #[tokio::test]
    async fn test_temperature_summary_between_is_inclusive() {
        let pool = seeded_pool().await;
        let stats = temperature_summary_between(&pool, "2017-01-01", "2017-01-03")
            .await
            .unwrap();
        assert_eq!(stats.min_tobs, Some(62.0));
        assert_eq!(stats.max_tobs, Some(70.0));
        assert!(approx(stats.avg_tobs, 65.25));
    }

    #[tokio::test]
    async fn test_temperature_summary_no_rows_is_all_null() {
        let pool = seeded_pool().await;
        let stats = temperature_summary_on(&pool, "2099-01-01").await.unwrap();
        assert_eq!(
            stats,
            TemperatureSummary {
                min_tobs: None,
                max_tobs: None,
                avg_tobs: None
            }
        );
    }
}
