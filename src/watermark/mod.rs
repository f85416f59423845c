//! Last-successful-poll timestamps, keyed by station identifier.

pub mod error;
pub mod memory_store;
pub mod postgres_store;

use crate::watermark::error::WatermarkError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Reads and advances per-station watermarks.
///
/// The poller only ever calls [`WatermarkStore::get_last_poll`]. Advancing the
/// watermark is left to the persistence side, after its writes succeed.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// The most recent poll timestamp recorded for `station`, if any.
    async fn get_last_poll(&self, station: &str) -> Result<Option<DateTime<Utc>>, WatermarkError>;

    /// Records that `station` was polled at `polled_at`.
    async fn record_poll(&self, station: &str, polled_at: DateTime<Utc>) -> Result<(), WatermarkError>;
}
