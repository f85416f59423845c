mod client;
mod config;
mod error;
mod normalize;
mod persist;
mod poller;
mod types;
mod validate;
mod vendors;
mod watermark;
mod window;

#[cfg(test)]
mod testing;

pub use error::PollerError;
pub use poller::*;

pub use config::{ConfigError, DatabaseConfig, PollerConfig};

pub use types::outcome::{PollFailure, PollOutcome, PollReport, PollState};
pub use types::params::{
    NormalizedParameterSet, RawParameterSet, END_FIELD, START_FIELD, STATION_FIELD, VENDOR_FIELD,
};
pub use types::poll_window::{default_lookback, PollWindow, DEFAULT_LOOKBACK_SECS};
pub use types::reading::Reading;
pub use types::vendor::Vendor;

pub use vendors::{
    CampbellStrategy, DavisStrategy, OnsetStrategy, RainwiseStrategy, VendorRegistry,
    VendorStrategy,
};

pub use normalize::error::NormalizeError;
pub use normalize::normalizer::ParameterNormalizer;

pub use validate::error::ValidationError;
pub use validate::validator::{check_identifier, check_vendor, check_window, validate};

pub use window::resolver::{WindowResolver, WindowSource};

pub use watermark::error::WatermarkError;
pub use watermark::memory_store::InMemoryWatermarkStore;
pub use watermark::postgres_store::PostgresWatermarkStore;
pub use watermark::WatermarkStore;

pub use client::error::VendorClientError;
pub use client::http_client::HttpVendorClient;
pub use client::VendorClient;

pub use persist::error::PersistError;
pub use persist::publisher::{ArtifactPublisher, RawDataRecord, PARSED_DATA_ARTIFACT, RAW_DATA_ARTIFACT};
pub use persist::sink::{ArtifactSink, DirectoryArtifactSink};
