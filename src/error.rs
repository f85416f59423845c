use crate::client::error::VendorClientError;
use crate::config::ConfigError;
use crate::normalize::error::NormalizeError;
use crate::persist::error::PersistError;
use crate::validate::error::ValidationError;
use crate::watermark::error::WatermarkError;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Watermark store unavailable")]
    StoreUnavailable(#[from] WatermarkError),

    #[error(transparent)]
    VendorClient(#[from] VendorClientError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PollerError {
    /// Whether a collaborator reported a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            PollerError::StoreUnavailable(e) => e.is_timeout(),
            PollerError::VendorClient(e) => e.is_timeout(),
            PollerError::Persist(PersistError::Watermark(e)) => e.is_timeout(),
            _ => false,
        }
    }

    /// The message followed by every source, joined with `": "`.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_includes_sources() {
        let err = PollerError::from(WatermarkError::Unavailable("connection refused".into()));
        assert_eq!(
            err.chain(),
            "Watermark store unavailable: Watermark store is unavailable: connection refused"
        );
    }

    #[test]
    fn test_vendor_timeout_is_classified() {
        let err = PollerError::from(VendorClientError::Timeout {
            vendor: "davis".into(),
            detail: "no response after 60s".into(),
        });
        assert!(err.is_timeout());
        assert!(!PollerError::from(ValidationError::IdentifierMissing).is_timeout());
    }
}
