//! Turns an inbound [`RawParameterSet`] into the vendor-shaped
//! [`NormalizedParameterSet`] the vendor client expects.

use crate::normalize::error::NormalizeError;
use crate::types::params::{NormalizedParameterSet, RawParameterSet, VENDOR_FIELD};
use crate::types::poll_window::PollWindow;
use crate::types::vendor::Vendor;
use crate::vendors::VendorRegistry;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Applies the resolved window and the vendor's remapping rules.
///
/// Normalization is pure: the same `(vendor, raw, window)` always yields the
/// same output and nothing outside the returned value is touched.
#[derive(Debug, Clone)]
pub struct ParameterNormalizer {
    registry: Arc<VendorRegistry>,
}

impl ParameterNormalizer {
    pub fn new(registry: Arc<VendorRegistry>) -> Self {
        Self { registry }
    }

    /// Writes the window into the parameters, then applies the vendor's remapping.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if a field the vendor's remapping needs is
    /// missing or a structured field cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chrono::{Duration, Utc};
    /// use station_poller::{ParameterNormalizer, PollWindow, RawParameterSet, Vendor, VendorRegistry};
    ///
    /// let normalizer = ParameterNormalizer::new(Arc::new(VendorRegistry::standard()));
    /// let raw = RawParameterSet::new()
    ///     .with("vendor", "RAINWISE")
    ///     .with("sn", "rw-1")
    ///     .with("user_id", "U1")
    ///     .with("apisec", "S1")
    ///     .with("apikey", "K1");
    /// let window = PollWindow::ending_at(Utc::now(), Duration::hours(1));
    ///
    /// let params = normalizer.normalize(&Vendor::Rainwise, &raw, window).unwrap();
    /// assert_eq!(params.get("mac").and_then(|v| v.as_str()), Some("U1"));
    /// assert_eq!(params.get("vendor").and_then(|v| v.as_str()), Some("rainwise"));
    /// assert_eq!(params.window(), Some(&window));
    /// ```
    pub fn normalize(
        &self,
        vendor: &Vendor,
        raw: &RawParameterSet,
        window: PollWindow,
    ) -> Result<NormalizedParameterSet, NormalizeError> {
        let windowed = NormalizedParameterSet::from_fields(raw.fields().clone()).with_window(window);
        self.remap_into(vendor, windowed)
    }

    /// Applies only the vendor's remapping; no window is attached yet.
    pub fn remap(
        &self,
        vendor: &Vendor,
        raw: &RawParameterSet,
    ) -> Result<NormalizedParameterSet, NormalizeError> {
        self.remap_into(vendor, NormalizedParameterSet::from_fields(raw.fields().clone()))
    }

    /// Attaches a resolved window to already remapped parameters.
    pub fn apply_window(
        &self,
        params: NormalizedParameterSet,
        window: PollWindow,
    ) -> NormalizedParameterSet {
        params.with_window(window)
    }

    fn remap_into(
        &self,
        vendor: &Vendor,
        mut params: NormalizedParameterSet,
    ) -> Result<NormalizedParameterSet, NormalizeError> {
        let fields = params.fields_mut();
        fields.insert(VENDOR_FIELD.to_string(), Value::String(vendor.tag().to_string()));
        if !self.registry.strategies(vendor).is_empty() {
            debug!("Setting {} parms...", vendor);
        }
        self.registry.remap(vendor, fields)?;
        Ok(params)
    }
}
