//! Collaborator doubles shared by the unit tests.

use crate::client::error::VendorClientError;
use crate::client::VendorClient;
use crate::persist::error::PersistError;
use crate::persist::sink::ArtifactSink;
use crate::types::outcome::PollReport;
use crate::types::params::{NormalizedParameterSet, RawParameterSet};
use crate::types::poll_window::PollWindow;
use crate::types::reading::Reading;
use crate::types::vendor::Vendor;
use crate::watermark::error::WatermarkError;
use crate::watermark::WatermarkStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Mutex;

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

pub(crate) fn reading() -> Reading {
    Reading::new(
        json!({"device": {"sn": "z6-12564"}, "data": [{"value": 21.4}]}),
        json!([{"timestamp": "2024-06-10T11:55:00Z", "temperature": 21.4}]),
    )
}

pub(crate) fn report() -> PollReport {
    let window = PollWindow::ending_at(now(), Duration::hours(24));
    let raw = RawParameterSet::new().with("vendor", "zentra").with("sn", "z6-12564");
    PollReport {
        station: "z6-12564".into(),
        vendor: Vendor::Zentra,
        window,
        polled_at: now(),
        params: NormalizedParameterSet::from_fields(raw.fields().clone()).with_window(window),
        reading: reading(),
    }
}

/// A store whose backend is down.
pub(crate) struct UnreachableWatermarkStore;

#[async_trait]
impl WatermarkStore for UnreachableWatermarkStore {
    async fn get_last_poll(&self, _station: &str) -> Result<Option<DateTime<Utc>>, WatermarkError> {
        Err(WatermarkError::Unavailable("connection refused".into()))
    }

    async fn record_poll(&self, _station: &str, _polled_at: DateTime<Utc>) -> Result<(), WatermarkError> {
        Err(WatermarkError::Unavailable("connection refused".into()))
    }
}

/// A sink that accepts deletes but has no room for writes.
pub(crate) struct FullDiskArtifactSink;

#[async_trait]
impl ArtifactSink for FullDiskArtifactSink {
    async fn delete(&self, _name: &str) -> Result<(), PersistError> {
        Ok(())
    }

    async fn write_text(&self, name: &str, _text: &str) -> Result<(), PersistError> {
        Err(PersistError::Write(
            name.into(),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ))
    }
}

/// Returns a canned response and remembers every request it was given.
pub(crate) struct StubVendorClient {
    response: Box<dyn Fn() -> Result<Reading, VendorClientError> + Send + Sync>,
    calls: Mutex<Vec<NormalizedParameterSet>>,
}

impl StubVendorClient {
    pub(crate) fn returning(reading: Reading) -> Self {
        Self::with(move || Ok(reading.clone()))
    }

    pub(crate) fn failing(message: &'static str) -> Self {
        Self::with(move || Err(VendorClientError::Reported(message.to_string())))
    }

    pub(crate) fn with(
        response: impl Fn() -> Result<Reading, VendorClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            response: Box::new(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<NormalizedParameterSet> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VendorClient for StubVendorClient {
    async fn get_reading(&self, params: &NormalizedParameterSet) -> Result<Reading, VendorClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(params.clone());
        }
        (self.response)()
    }
}
