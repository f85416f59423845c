//! The seam to the external vendor-API client.

pub mod error;
pub mod http_client;

use crate::client::error::VendorClientError;
use crate::types::params::NormalizedParameterSet;
use crate::types::reading::Reading;
use async_trait::async_trait;

/// Fetches one reading from a vendor's API.
///
/// Implementations must report non-2xx responses and device-not-found
/// conditions as distinguishable [`VendorClientError`] variants, and report
/// timeouts as [`VendorClientError::Timeout`].
#[async_trait]
pub trait VendorClient: Send + Sync {
    async fn get_reading(&self, params: &NormalizedParameterSet) -> Result<Reading, VendorClientError>;
}
