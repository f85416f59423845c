//! Writes the artifacts of a successful poll and advances the station's watermark.

use crate::persist::error::PersistError;
use crate::persist::sink::ArtifactSink;
use crate::types::outcome::PollReport;
use crate::types::vendor::Vendor;
use crate::watermark::WatermarkStore;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Raw-data record picked up by the downstream loader.
pub const RAW_DATA_ARTIFACT: &str = "raw_data.json";
/// Parsed payload of the most recent poll.
pub const PARSED_DATA_ARTIFACT: &str = "parsed.data";

const POLL_DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

/// The `raw_data.json` artifact.
#[derive(Debug, Serialize)]
pub struct RawDataRecord<'a> {
    pub sn: &'a str,
    pub vendor: Vendor,
    pub poll_date: String,
    pub data: &'a Value,
}

impl<'a> RawDataRecord<'a> {
    pub fn from_report(report: &'a PollReport) -> Self {
        Self {
            sn: &report.station,
            vendor: report.vendor.clone(),
            poll_date: report.polled_at.format(POLL_DATE_FORMAT).to_string(),
            data: &report.reading.raw,
        }
    }
}

pub struct ArtifactPublisher {
    sink: Arc<dyn ArtifactSink>,
    watermarks: Arc<dyn WatermarkStore>,
}

impl ArtifactPublisher {
    pub fn new(sink: Arc<dyn ArtifactSink>, watermarks: Arc<dyn WatermarkStore>) -> Self {
        Self { sink, watermarks }
    }

    /// Deletes artifacts left by a previous cycle.
    pub async fn clear(&self) -> Result<(), PersistError> {
        self.sink.delete(RAW_DATA_ARTIFACT).await?;
        self.sink.delete(PARSED_DATA_ARTIFACT).await
    }

    /// Writes both artifacts, then records the watermark.
    ///
    /// The watermark is only advanced once both writes have succeeded. Each
    /// write is attempted once.
    pub async fn publish(&self, report: &PollReport) -> Result<(), PersistError> {
        let raw = serde_json::to_string(&RawDataRecord::from_report(report)).map_err(|source| {
            PersistError::Encode {
                name: RAW_DATA_ARTIFACT,
                source,
            }
        })?;
        let parsed =
            serde_json::to_string(&report.reading.parsed).map_err(|source| PersistError::Encode {
                name: PARSED_DATA_ARTIFACT,
                source,
            })?;

        info!("Writing the {} entry for station {}...", RAW_DATA_ARTIFACT, report.station);
        self.replace(RAW_DATA_ARTIFACT, &raw).await?;
        info!("Writing the {} file for station {}...", PARSED_DATA_ARTIFACT, report.station);
        self.replace(PARSED_DATA_ARTIFACT, &parsed).await?;

        self.watermarks
            .record_poll(&report.station, report.polled_at)
            .await?;
        info!(
            "Advanced watermark for station {} to {}",
            report.station, report.polled_at
        );
        Ok(())
    }

    async fn replace(&self, name: &str, text: &str) -> Result<(), PersistError> {
        self.sink.delete(name).await?;
        self.sink.write_text(name, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::sink::DirectoryArtifactSink;
    use crate::testing::{report, UnreachableWatermarkStore};
    use crate::watermark::memory_store::InMemoryWatermarkStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_writes_both_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let sink = Arc::new(DirectoryArtifactSink::open(tmp.path()).await?);
        let store = Arc::new(InMemoryWatermarkStore::new());
        let publisher = ArtifactPublisher::new(sink.clone(), store.clone());
        let report = report();

        publisher.publish(&report).await?;

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(sink.path_of(RAW_DATA_ARTIFACT))?)?;
        assert_eq!(
            raw,
            json!({
                "sn": "z6-12564",
                "vendor": "zentra",
                "poll_date": "06/10/2024 12:00",
                "data": report.reading.raw,
            })
        );
        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(sink.path_of(PARSED_DATA_ARTIFACT))?)?;
        assert_eq!(parsed, report.reading.parsed);

        assert_eq!(store.get_last_poll("z6-12564").await?, Some(report.polled_at));
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_removes_stale_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let sink = Arc::new(DirectoryArtifactSink::open(tmp.path()).await?);
        sink.write_text(RAW_DATA_ARTIFACT, "stale").await?;
        sink.write_text(PARSED_DATA_ARTIFACT, "stale").await?;

        let publisher = ArtifactPublisher::new(sink.clone(), Arc::new(InMemoryWatermarkStore::new()));
        publisher.clear().await?;

        assert!(!sink.path_of(RAW_DATA_ARTIFACT).exists());
        assert!(!sink.path_of(PARSED_DATA_ARTIFACT).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_watermark_failure_is_reported_after_writes() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let sink = Arc::new(DirectoryArtifactSink::open(tmp.path()).await?);
        let publisher = ArtifactPublisher::new(sink.clone(), Arc::new(UnreachableWatermarkStore));

        let err = publisher.publish(&report()).await.unwrap_err();
        assert!(matches!(err, PersistError::Watermark(_)));
        assert!(sink.path_of(RAW_DATA_ARTIFACT).exists());
        Ok(())
    }
}
