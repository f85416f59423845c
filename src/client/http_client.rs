//! A [`VendorClient`] that forwards normalized parameters to a vendor-API
//! gateway over HTTP.
//!
//! The gateway accepts `POST {base}/readings` with the normalized parameters as a
//! JSON object and answers with `{"raw": ..., "parsed": ...}`.

use crate::client::error::VendorClientError;
use crate::client::VendorClient;
use crate::types::params::NormalizedParameterSet;
use crate::types::reading::Reading;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub struct HttpVendorClient {
    readings_url: String,
    client: Client,
}

impl HttpVendorClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, VendorClientError> {
        let readings_url = format!("{}/readings", base_url.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| VendorClientError::Network {
                url: readings_url.clone(),
                source,
            })?;
        Ok(Self {
            readings_url,
            client,
        })
    }

    pub fn readings_url(&self) -> &str {
        &self.readings_url
    }

    fn transport_error(&self, vendor: &str, source: reqwest::Error) -> VendorClientError {
        if source.is_timeout() {
            VendorClientError::Timeout {
                vendor: vendor.to_string(),
                detail: source.to_string(),
            }
        } else {
            VendorClientError::Network {
                url: self.readings_url.clone(),
                source,
            }
        }
    }
}

#[async_trait]
impl VendorClient for HttpVendorClient {
    async fn get_reading(&self, params: &NormalizedParameterSet) -> Result<Reading, VendorClientError> {
        let vendor = params
            .vendor()
            .map(|vendor| vendor.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let vendor = vendor.as_str();
        debug!("Posting {} request to {}", vendor, self.readings_url);

        let response = self
            .client
            .post(&self.readings_url)
            .json(params)
            .send()
            .await
            .map_err(|e| self.transport_error(vendor, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<failed to read response body: {}>", e),
            };
            warn!("HTTP error for {}: {} {}", self.readings_url, status, body);
            return Err(status_error(
                status,
                vendor,
                params.station().unwrap_or_default(),
                body,
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(vendor, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Maps a non-2xx gateway status to the matching error kind.
fn status_error(status: StatusCode, vendor: &str, station: &str, body: String) -> VendorClientError {
    match status {
        StatusCode::NOT_FOUND => VendorClientError::DeviceNotFound {
            vendor: vendor.to_string(),
            station: station.to_string(),
            message: body,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            VendorClientError::MalformedRequest {
                vendor: vendor.to_string(),
                message: body,
            }
        }
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => VendorClientError::Timeout {
            vendor: vendor.to_string(),
            detail: format!("HTTP {}", status.as_u16()),
        },
        _ => VendorClientError::HttpStatus {
            vendor: vendor.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}
