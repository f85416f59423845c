use crate::watermark::error::WatermarkError;
use crate::watermark::WatermarkStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A process-local watermark store.
///
/// Only the latest timestamp per station is kept, which is all the
/// `ORDER BY ... DESC` query against the database ever returns. Recording an
/// older poll leaves the watermark where it is.
#[derive(Debug, Default)]
pub struct InMemoryWatermarkStore {
    latest: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a watermark, for tests and local runs.
    pub fn with_watermark(mut self, station: impl Into<String>, polled_at: DateTime<Utc>) -> Self {
        advance(self.latest.get_mut(), station.into(), polled_at);
        self
    }
}

fn advance(latest: &mut HashMap<String, DateTime<Utc>>, station: String, polled_at: DateTime<Utc>) {
    latest
        .entry(station)
        .and_modify(|current| *current = (*current).max(polled_at))
        .or_insert(polled_at);
}

#[async_trait]
impl WatermarkStore for InMemoryWatermarkStore {
    async fn get_last_poll(&self, station: &str) -> Result<Option<DateTime<Utc>>, WatermarkError> {
        Ok(self.latest.read().await.get(station).copied())
    }

    async fn record_poll(&self, station: &str, polled_at: DateTime<Utc>) -> Result<(), WatermarkError> {
        advance(&mut *self.latest.write().await, station.to_string(), polled_at);
        Ok(())
    }
}
