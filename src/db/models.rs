use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One ARGO float reading. Immutable after insert; the service only reads.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    /// WMO identifier of the originating float
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
