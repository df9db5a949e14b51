use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::db::models::Measurement;

/// Whole-table summary used both for the stats endpoint and as prompt
/// context.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct DatasetStats {
    pub total_measurements: i64,
    pub unique_floats: i64,
    /// Mean over non-null temperatures, rounded to 2 decimal places;
    /// 0 when no temperature has been recorded.
    pub average_temperature: f64,
}

/// Rows returned by a filtered query when the caller does not ask for a
/// specific limit.
pub const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Upper bound on rows a single filtered query may return.
pub const MAX_QUERY_LIMIT: i64 = 500;

/// Optional bounds for a filtered measurement query. Range filters compare
/// against nullable columns, so rows with a null reading never match a
/// bound on that reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementFilter {
    pub min_pressure: Option<f64>,
    pub max_pressure: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_salinity: Option<f64>,
    pub max_salinity: Option<f64>,
    pub float_id: Option<String>,
    pub limit: Option<i64>,
}

/// Read-only query layer over the `measurements` table.
#[derive(Clone)]
pub struct DataService {
    pool: SqlitePool,
}

impl DataService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn dataset_stats(&self) -> Result<DatasetStats> {
        let stats = sqlx::query_as::<_, DatasetStats>(
            r#"
            SELECT
                COUNT(*)                                   AS total_measurements,
                COUNT(DISTINCT float_id)                   AS unique_floats,
                COALESCE(ROUND(AVG(temperature), 2), 0.0)  AS average_temperature
            FROM measurements
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("failed to aggregate dataset statistics")?;

        debug!(
            total = stats.total_measurements,
            floats = stats.unique_floats,
            "Computed dataset statistics"
        );
        Ok(stats)
    }

    /// The `limit` most recent measurements, newest first. Rows without a
    /// timestamp sort last so they can never displace dated readings.
    pub async fn recent_measurements(&self, limit: i64) -> Result<Vec<Measurement>> {
        let rows = sqlx::query_as::<_, Measurement>(
            r#"
            SELECT id, float_id, temperature, salinity, pressure,
                   latitude, longitude, timestamp
            FROM measurements
            ORDER BY timestamp DESC NULLS LAST
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch recent measurements")?;

        debug!(rows = rows.len(), "Fetched recent measurements");
        Ok(rows)
    }

    /// Measurements matching `filter`, newest first with the same
    /// nulls-last policy as `recent_measurements`. The limit is clamped to
    /// `MAX_QUERY_LIMIT`.
    pub async fn query_measurements(&self, filter: &MeasurementFilter) -> Result<Vec<Measurement>> {
        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT id, float_id, temperature, salinity, pressure, \
                    latitude, longitude, timestamp \
             FROM measurements WHERE 1 = 1",
        );

        if let Some(v) = filter.min_pressure {
            query.push(" AND pressure >= ").push_bind(v);
        }
        if let Some(v) = filter.max_pressure {
            query.push(" AND pressure <= ").push_bind(v);
        }
        if let Some(v) = filter.min_temperature {
            query.push(" AND temperature >= ").push_bind(v);
        }
        if let Some(v) = filter.max_temperature {
            query.push(" AND temperature <= ").push_bind(v);
        }
        if let Some(v) = filter.min_salinity {
            query.push(" AND salinity >= ").push_bind(v);
        }
        if let Some(v) = filter.max_salinity {
            query.push(" AND salinity <= ").push_bind(v);
        }
        if let Some(ref id) = filter.float_id {
            query.push(" AND float_id = ").push_bind(id.as_str());
        }

        let limit = filter
            .limit
            .unwrap_or(DEFAULT_QUERY_LIMIT)
            .clamp(1, MAX_QUERY_LIMIT);
        query
            .push(" ORDER BY timestamp DESC NULLS LAST LIMIT ")
            .push_bind(limit);

        let rows = query
            .build_query_as::<Measurement>()
            .fetch_all(&self.pool)
            .await
            .context("failed to run filtered measurement query")?;

        debug!(rows = rows.len(), limit, "Ran filtered measurement query");
        Ok(rows)
    }
}
