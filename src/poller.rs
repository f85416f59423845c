//! This module provides the main entry point: [`Poller`] sequences window
//! resolution, parameter normalization, validation and the vendor call for a
//! single poll request, and optionally hands successful polls to persistence.

use crate::client::http_client::HttpVendorClient;
use crate::client::VendorClient;
use crate::config::{ConfigError, PollerConfig};
use crate::error::PollerError;
use crate::normalize::normalizer::ParameterNormalizer;
use crate::persist::publisher::ArtifactPublisher;
use crate::persist::sink::{ArtifactSink, DirectoryArtifactSink};
use crate::types::outcome::{PollOutcome, PollReport, PollState, PollTrace};
use crate::types::params::{RawParameterSet, STATION_FIELD, VENDOR_FIELD};
use crate::validate::validator::{check_identifier, check_vendor, validate};
use crate::vendors::VendorRegistry;
use crate::watermark::postgres_store::PostgresWatermarkStore;
use crate::watermark::WatermarkStore;
use crate::window::resolver::{WindowResolver, WindowSource};
use bon::bon;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Polls a vendor API for one station at a time.
///
/// A poll runs `Started → WindowResolved → Validated → Dispatched` and ends in
/// `Succeeded` or `Failed`. There is exactly one vendor call per poll and no
/// retry; all validation happens before that call.
///
/// The poller never advances a watermark. With an artifact sink configured,
/// [`Poller::run_cycle`] publishes successful polls, and publishing is what
/// records the new watermark.
///
/// Polls for different stations share no mutable state. Two overlapping polls
/// for the *same* station can read the same watermark and request overlapping
/// windows; callers that care must serialize polls per station.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use station_poller::{HttpVendorClient, InMemoryWatermarkStore, Poller, RawParameterSet};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let poller = Poller::builder()
///     .watermarks(Arc::new(InMemoryWatermarkStore::new()))
///     .client(Arc::new(HttpVendorClient::new(
///         "http://localhost:8080",
///         std::time::Duration::from_secs(60),
///     )?))
///     .build();
///
/// let request = RawParameterSet::from_json(r#"{"vendor": "zentra", "sn": "z6-12564", "token": "T"}"#)?;
/// let outcome = poller.poll().params(request).call().await;
/// println!("{}", outcome);
/// # Ok(())
/// # }
/// ```
pub struct Poller {
    resolver: WindowResolver,
    normalizer: ParameterNormalizer,
    client: Arc<dyn VendorClient>,
    publisher: Option<ArtifactPublisher>,
}

#[bon]
impl Poller {
    /// Creates a poller from its collaborators.
    ///
    /// # Arguments
    ///
    /// * `.watermarks(..)`: **Required.** Where last-poll timestamps are read (and, when publishing, written).
    /// * `.client(..)`: **Required.** The vendor client that performs the actual API call.
    /// * `.registry(..)`: Optional. Per-vendor rules. Defaults to [`VendorRegistry::standard`].
    /// * `.artifacts(..)`: Optional. Enables publishing in [`Poller::run_cycle`].
    /// * `.lookback(..)`: Optional. Window length for never-polled stations. Defaults to 24 hours; negative values count as zero.
    #[builder]
    pub fn new(
        watermarks: Arc<dyn WatermarkStore>,
        client: Arc<dyn VendorClient>,
        registry: Option<VendorRegistry>,
        artifacts: Option<Arc<dyn ArtifactSink>>,
        lookback: Option<Duration>,
    ) -> Self {
        let registry = Arc::new(registry.unwrap_or_else(VendorRegistry::standard));
        let mut resolver = WindowResolver::new(watermarks.clone(), registry.clone());
        if let Some(lookback) = lookback {
            resolver = resolver.with_lookback(lookback);
        }
        Self {
            resolver,
            normalizer: ParameterNormalizer::new(registry),
            client,
            publisher: artifacts.map(|sink| ArtifactPublisher::new(sink, watermarks)),
        }
    }

    /// Wires a poller from configuration: Postgres watermarks, the HTTP gateway
    /// client and a directory artifact sink.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Config`] if no gateway URL is configured, and the
    /// collaborator's error if the database or artifact directory is unusable.
    pub async fn from_config(config: &PollerConfig) -> Result<Self, PollerError> {
        let gateway_url = config
            .gateway_url
            .as_deref()
            .ok_or(ConfigError::MissingVar("VENDOR_GATEWAY_URL"))?;
        let client = HttpVendorClient::new(gateway_url, config.vendor_timeout)?;
        let watermarks = PostgresWatermarkStore::connect(&config.database).await?;
        let artifacts = DirectoryArtifactSink::open(&config.artifact_dir).await?;

        Ok(Self::builder()
            .watermarks(Arc::new(watermarks))
            .client(Arc::new(client))
            .artifacts(Arc::new(artifacts))
            .build())
    }

    /// Runs one poll.
    ///
    /// # Arguments
    ///
    /// * `.params(RawParameterSet)`: **Required.** The inbound request.
    /// * `.now(DateTime<Utc>)`: Optional. The time the window is resolved against. Defaults to `Utc::now()`.
    ///
    /// # Returns
    ///
    /// A [`PollOutcome`]. Failures carry the original error with its full
    /// source chain and the last state reached.
    #[builder]
    pub async fn poll(&self, params: RawParameterSet, now: Option<DateTime<Utc>>) -> PollOutcome {
        let now = now.unwrap_or_else(Utc::now);
        let mut trace = PollTrace::start();
        match self.run_stages(&params, now, &mut trace).await {
            Ok(report) => {
                info!(
                    "Poll of {} station {} succeeded",
                    report.vendor, report.station
                );
                trace.succeed(report)
            }
            Err(error) => trace.fail(error),
        }
    }

    /// Runs a full cycle: deletes stale artifacts, polls, and publishes on success.
    ///
    /// Without an artifact sink this is the same as [`Poller::poll`].
    ///
    /// If publishing fails, the outcome is turned into a failure carrying the
    /// [`PollerError::Persist`] cause, and the fetched report is kept in
    /// [`crate::PollFailure::unpublished`]. The watermark is not advanced.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Persist`] only if stale artifacts cannot be removed,
    /// in which case no poll is attempted.
    #[builder]
    pub async fn run_cycle(
        &self,
        params: RawParameterSet,
        now: Option<DateTime<Utc>>,
    ) -> Result<PollOutcome, PollerError> {
        if let Some(publisher) = &self.publisher {
            publisher.clear().await?;
        }
        let outcome = self.poll().params(params).maybe_now(now).call().await;
        let published = match (&self.publisher, outcome.report()) {
            (Some(publisher), Some(report)) => publisher.publish(report).await,
            _ => Ok(()),
        };
        match published {
            Ok(()) => Ok(outcome),
            Err(e) => Ok(outcome.unpublished(e.into())),
        }
    }

    async fn run_stages(
        &self,
        raw: &RawParameterSet,
        now: DateTime<Utc>,
        trace: &mut PollTrace,
    ) -> Result<PollReport, PollerError> {
        let vendor = check_vendor(raw.get(VENDOR_FIELD), raw.get(STATION_FIELD))?;
        let params = self.normalizer.remap(&vendor, raw)?;
        let station = check_identifier(params.get(STATION_FIELD))?;
        info!("Polling {} station {}...", vendor, station);

        let (window, source) = match raw.supplied_window()? {
            Some(window) => (self.resolver.clamp(&vendor, window), WindowSource::Supplied),
            None => self.resolver.resolve_traced(&station, &vendor, now).await?,
        };
        debug!("Window for station {} taken from {:?}", station, source);
        trace.advance(PollState::WindowResolved);

        let params = self.normalizer.apply_window(params, window);
        validate(&params)?;
        trace.advance(PollState::Validated);

        info!("Calling the {} API...", vendor);
        trace.advance(PollState::Dispatched);
        let timer = Instant::now();
        let result = self.client.get_reading(&params).await;
        info!(
            "The call to {} took {:.3} seconds.",
            vendor,
            timer.elapsed().as_secs_f64()
        );

        Ok(PollReport {
            station,
            vendor,
            window,
            polled_at: now,
            params,
            reading: result?,
        })
    }
}
