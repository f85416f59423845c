//! Per-vendor rules, looked up by [`Vendor`] tag.
//!
//! Each vendor may have any number of [`VendorStrategy`] entries. Registering a
//! strategy adds to the rules already in place for that vendor; nothing else in
//! the crate branches on the vendor tag.

pub mod campbell;
pub mod davis;
pub mod onset;
pub mod rainwise;

use crate::normalize::error::NormalizeError;
use crate::types::poll_window::PollWindow;
use crate::types::vendor::Vendor;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub use campbell::CampbellStrategy;
pub use davis::DavisStrategy;
pub use onset::OnsetStrategy;
pub use rainwise::RainwiseStrategy;

/// Vendor-specific parameter remapping and window constraints.
///
/// Both hooks default to doing nothing, so a strategy only implements what its
/// vendor needs.
pub trait VendorStrategy: Send + Sync {
    /// Rewrites `fields` into the shape the vendor client expects.
    fn remap(&self, _fields: &mut Map<String, Value>) -> Result<(), NormalizeError> {
        Ok(())
    }

    /// Narrows `window` to what the vendor API accepts. Must never widen it.
    fn clamp(&self, window: PollWindow) -> PollWindow {
        window
    }
}

/// Lookup table from vendor tag to its strategies, applied in registration order.
#[derive(Clone, Default)]
pub struct VendorRegistry {
    strategies: HashMap<Vendor, Vec<Arc<dyn VendorStrategy>>>,
}

impl VendorRegistry {
    /// A registry with no rules for any vendor.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules every deployment needs.
    pub fn standard() -> Self {
        Self::empty()
            .with(Vendor::Davis, DavisStrategy::default())
            .with(Vendor::Rainwise, RainwiseStrategy)
            .with(Vendor::Campbell, CampbellStrategy)
            .with(Vendor::Onset, OnsetStrategy)
    }

    pub fn register(&mut self, vendor: Vendor, strategy: Arc<dyn VendorStrategy>) {
        self.strategies.entry(vendor).or_default().push(strategy);
    }

    /// Builder-style [`VendorRegistry::register`].
    pub fn with(mut self, vendor: Vendor, strategy: impl VendorStrategy + 'static) -> Self {
        self.register(vendor, Arc::new(strategy));
        self
    }

    pub fn strategies(&self, vendor: &Vendor) -> &[Arc<dyn VendorStrategy>] {
        self.strategies
            .get(vendor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn remap(&self, vendor: &Vendor, fields: &mut Map<String, Value>) -> Result<(), NormalizeError> {
        self.strategies(vendor)
            .iter()
            .try_for_each(|strategy| strategy.remap(fields))
    }

    pub fn clamp(&self, vendor: &Vendor, window: PollWindow) -> PollWindow {
        self.strategies(vendor)
            .iter()
            .fold(window, |window, strategy| strategy.clamp(window))
    }
}

impl std::fmt::Debug for VendorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<_> = self
            .strategies
            .iter()
            .map(|(vendor, strategies)| (vendor.tag(), strategies.len()))
            .collect();
        counts.sort();
        f.debug_struct("VendorRegistry").field("strategies", &counts).finish()
    }
}

/// Copies `from` into `to`, failing if `from` is absent or null.
pub(crate) fn copy_field(
    fields: &mut Map<String, Value>,
    vendor: Vendor,
    from: &'static str,
    to: &'static str,
) -> Result<(), NormalizeError> {
    let value = fields
        .get(from)
        .filter(|value| !value.is_null())
        .cloned()
        .ok_or_else(|| NormalizeError::MissingField {
            vendor,
            field: from,
        })?;
    fields.insert(to.to_string(), value);
    Ok(())
}
