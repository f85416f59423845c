//! Works out which time range to request from a vendor.

use crate::types::poll_window::{default_lookback, PollWindow};
use crate::types::vendor::Vendor;
use crate::vendors::VendorRegistry;
use crate::watermark::error::WatermarkError;
use crate::watermark::WatermarkStore;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::sync::Arc;

/// Where a resolved window's start came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// The caller pre-set both bounds.
    Supplied,
    /// The station's last recorded poll.
    Watermark,
    /// No watermark exists; the default lookback was used.
    Lookback,
}

/// Fills in the poll window from the station's watermark, then applies the
/// vendor's window constraints.
#[derive(Clone)]
pub struct WindowResolver {
    store: Arc<dyn WatermarkStore>,
    registry: Arc<VendorRegistry>,
    lookback: Duration,
}

impl WindowResolver {
    pub fn new(store: Arc<dyn WatermarkStore>, registry: Arc<VendorRegistry>) -> Self {
        Self {
            store,
            registry,
            lookback: default_lookback(),
        }
    }

    /// Overrides the lookback used for stations with no watermark.
    ///
    /// A negative lookback is treated as zero, so a never-polled station gets an
    /// empty window rather than an inverted one.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        if lookback < Duration::zero() {
            warn!("Negative lookback {} replaced with zero", lookback);
        }
        self.lookback = lookback.max(Duration::zero());
        self
    }

    /// Resolves `[start, end)` for `station`, ending at `now`.
    ///
    /// `start` is the station's watermark, or `now - lookback` if it has none.
    /// The vendor's clamps are applied afterwards and can only shrink the window.
    /// A watermark later than `now` yields an empty window at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`WatermarkError`] if the store cannot be read. There is no retry.
    pub async fn resolve(
        &self,
        station: &str,
        vendor: &Vendor,
        now: DateTime<Utc>,
    ) -> Result<PollWindow, WatermarkError> {
        self.resolve_traced(station, vendor, now)
            .await
            .map(|(window, _)| window)
    }

    pub(crate) async fn resolve_traced(
        &self,
        station: &str,
        vendor: &Vendor,
        now: DateTime<Utc>,
    ) -> Result<(PollWindow, WindowSource), WatermarkError> {
        let (start, source) = match self.store.get_last_poll(station).await? {
            Some(last) if last > now => {
                warn!(
                    "Watermark {} for station {} is after the current time {}",
                    last, station, now
                );
                (now, WindowSource::Watermark)
            }
            Some(last) => (last, WindowSource::Watermark),
            None => (now - self.lookback, WindowSource::Lookback),
        };
        let window = self.clamp(vendor, PollWindow::new(start, now));
        info!(
            "Resolved window {} .. {} for station {} ({:?})",
            window.start, window.end, station, source
        );
        Ok((window, source))
    }

    /// Applies the vendor's window constraints to an already chosen window.
    pub fn clamp(&self, vendor: &Vendor, window: PollWindow) -> PollWindow {
        self.registry.clamp(vendor, window)
    }
}
