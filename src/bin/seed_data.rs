//! One-shot loader of synthetic ARGO profiles, for development without
//! access to a live data feed.
//!
//! Usage:
//!   cargo run --bin seed_data

use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use floatchat::db;

const PROFILES: usize = 3;
const LEVELS_PER_PROFILE: usize = 50;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:floatchat.db?mode=rwc".to_owned());
    let float_id = std::env::var("FLOAT_ID").unwrap_or_else(|_| "2902746".to_owned());

    let pool = db::create_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let mut rng = rand::rng();
    let base_time = Utc::now() - Duration::days(30);
    // Indian Ocean, roughly where the reference float drifts.
    let base_lat = -10.0;
    let base_lon = 75.0;

    let mut inserted = 0usize;
    for profile in 0..PROFILES {
        // One profile every ~10 days; the float drifts a little in between.
        let time = base_time + Duration::days(profile as i64 * 10);
        let lat = base_lat + rng.random_range(-0.5..0.5);
        let lon = base_lon + rng.random_range(-0.5..0.5);

        for level in 0..LEVELS_PER_PROFILE {
            let pressure = 5.0 + (2000.0 - 5.0) * level as f64 / (LEVELS_PER_PROFILE - 1) as f64;
            let temperature = temperature_at(pressure) + rng.random_range(-0.5..0.5);
            let salinity: f64 = if pressure < 50.0 {
                34.5 + rng.random_range(-0.2..0.2)
            } else {
                34.8 + rng.random_range(-0.15..0.15)
            };

            sqlx::query(
                "INSERT INTO measurements
                     (float_id, temperature, salinity, pressure, latitude, longitude, timestamp)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&float_id)
            .bind((temperature * 100.0).round() / 100.0)
            .bind((salinity * 100.0).round() / 100.0)
            .bind(pressure)
            .bind(lat)
            .bind(lon)
            .bind(time)
            .execute(&pool)
            .await?;
            inserted += 1;
        }
    }

    info!(rows = inserted, float_id = %float_id, "Synthetic measurements loaded");
    Ok(())
}

/// Idealised ocean column: warm mixed layer, steep thermocline, cold deep
/// water.
fn temperature_at(pressure: f64) -> f64 {
    if pressure < 100.0 {
        28.0 - (pressure / 100.0) * 3.0
    } else if pressure < 500.0 {
        25.0 - (pressure - 100.0) / 400.0 * 15.0
    } else {
        10.0 - (pressure - 500.0) / 1500.0 * 8.0
    }
}
