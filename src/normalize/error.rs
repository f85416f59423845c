use crate::types::vendor::Vendor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{vendor} requires field '{field}'")]
    MissingField { vendor: Vendor, field: &'static str },

    #[error("Field '{field}' for {vendor} is not valid JSON")]
    MalformedStructuredField {
        vendor: Vendor,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Field '{field}' for {vendor} must be a JSON object")]
    StructuredFieldNotMapping { vendor: Vendor, field: &'static str },
}
