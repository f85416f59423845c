use thiserror::Error;

#[derive(Debug, Error)]
pub enum VendorClientError {
    #[error("Request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("The call to the {vendor} API timed out: {detail}")]
    Timeout { vendor: String, detail: String },

    #[error("{vendor} API returned HTTP {status}: {body}")]
    HttpStatus {
        vendor: String,
        status: u16,
        body: String,
    },

    #[error("{vendor} API could not find device '{station}': {message}")]
    DeviceNotFound {
        vendor: String,
        station: String,
        message: String,
    },

    #[error("{vendor} API rejected the request: {message}")]
    MalformedRequest { vendor: String, message: String },

    #[error("Failed to decode the vendor reading")]
    Decode(#[from] serde_json::Error),

    /// A failure reported by the vendor client, passed through verbatim.
    #[error("{0}")]
    Reported(String),
}

impl VendorClientError {
    pub fn is_timeout(&self) -> bool {
        match self {
            VendorClientError::Timeout { .. } => true,
            VendorClientError::Network { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
