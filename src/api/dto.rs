use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::{DatasetStats, MeasurementFilter};
use crate::db::models::Measurement;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's question. Missing field is treated as an empty question,
    /// not as a client error.
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsDto {
    pub total_measurements: i64,
    pub unique_floats: i64,
    pub average_temperature: f64,
}

impl From<DatasetStats> for StatsDto {
    fn from(s: DatasetStats) -> Self {
        Self {
            total_measurements: s.total_measurements,
            unique_floats: s.unique_floats,
            average_temperature: s.average_temperature,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeasurementDto {
    pub id: i64,
    pub float_id: String,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// PSU
    pub salinity: Option<f64>,
    /// Decibars
    pub pressure: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<Measurement> for MeasurementDto {
    fn from(m: Measurement) -> Self {
        Self {
            id: m.id,
            float_id: m.float_id,
            temperature: m.temperature,
            salinity: m.salinity,
            pressure: m.pressure,
            latitude: m.latitude,
            longitude: m.longitude,
            timestamp: m.timestamp,
        }
    }
}

/// Filters for `POST /api/data/query`. Every field is optional; an empty
/// body returns the newest rows up to the default limit.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct QueryFilters {
    /// Decibars
    pub min_pressure: Option<f64>,
    pub max_pressure: Option<f64>,
    /// Degrees Celsius
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    /// PSU
    pub min_salinity: Option<f64>,
    pub max_salinity: Option<f64>,
    pub float_id: Option<String>,
    pub limit: Option<i64>,
}

impl From<QueryFilters> for MeasurementFilter {
    fn from(f: QueryFilters) -> Self {
        Self {
            min_pressure: f.min_pressure,
            max_pressure: f.max_pressure,
            min_temperature: f.min_temperature,
            max_temperature: f.max_temperature,
            min_salinity: f.min_salinity,
            max_salinity: f.max_salinity,
            float_id: f.float_id,
            limit: f.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthDto {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
