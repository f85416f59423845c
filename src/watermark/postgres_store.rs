use crate::config::DatabaseConfig;
use crate::types::into_utc_trait::IntoUtcDateTime;
use crate::watermark::error::WatermarkError;
use crate::watermark::WatermarkStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

const LAST_POLL_QUERY: &str =
    "SELECT poll_date FROM raw_data WHERE sn = $1 ORDER BY poll_date DESC LIMIT 1";
const RECORD_POLL_QUERY: &str = "INSERT INTO raw_data (sn, poll_date) VALUES ($1, $2)";

/// Watermarks kept in the `raw_data` table, one row per successful poll.
///
/// `poll_date` is a `timestamp` column holding UTC wall-clock time.
#[derive(Debug, Clone)]
pub struct PostgresWatermarkStore {
    pool: PgPool,
}

impl PostgresWatermarkStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, WatermarkError> {
        let ssl_mode: PgSslMode = config.ssl_mode.parse().map_err(WatermarkError::Connect)?;
        let options = PgConnectOptions::new()
            .host(&config.host)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password)
            .ssl_mode(ssl_mode);

        info!("Connecting to the database at {}...", config.host);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(WatermarkError::Connect)?;
        info!("Connection established.");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        debug!("Disconnecting from the database...");
        self.pool.close().await;
    }
}

#[async_trait]
impl WatermarkStore for PostgresWatermarkStore {
    async fn get_last_poll(&self, station: &str) -> Result<Option<DateTime<Utc>>, WatermarkError> {
        let last = sqlx::query_scalar::<_, NaiveDateTime>(LAST_POLL_QUERY)
            .bind(station)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| WatermarkError::Query {
                station: station.to_string(),
                source,
            })?;
        Ok(last.map(IntoUtcDateTime::into_utc))
    }

    async fn record_poll(&self, station: &str, polled_at: DateTime<Utc>) -> Result<(), WatermarkError> {
        sqlx::query(RECORD_POLL_QUERY)
            .bind(station)
            .bind(polled_at.naive_utc())
            .execute(&self.pool)
            .await
            .map_err(|source| WatermarkError::Record {
                station: station.to_string(),
                source,
            })?;
        Ok(())
    }
}
