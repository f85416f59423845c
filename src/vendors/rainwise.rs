use crate::normalize::error::NormalizeError;
use crate::types::vendor::Vendor;
use crate::vendors::{copy_field, VendorStrategy};
use serde_json::{Map, Value};

/// Rainwise expects the MAC address as both `username` and `mac`, and the API
/// key pair as `pid`/`sid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RainwiseStrategy;

impl VendorStrategy for RainwiseStrategy {
    fn remap(&self, fields: &mut Map<String, Value>) -> Result<(), NormalizeError> {
        copy_field(fields, Vendor::Rainwise, "user_id", "username")?;
        copy_field(fields, Vendor::Rainwise, "user_id", "mac")?;
        copy_field(fields, Vendor::Rainwise, "apisec", "pid")?;
        copy_field(fields, Vendor::Rainwise, "apikey", "sid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remap_credentials() -> Result<(), NormalizeError> {
        let mut fields = json!({"user_id": "U1", "apisec": "S1", "apikey": "K1"})
            .as_object()
            .cloned()
            .unwrap_or_default();
        RainwiseStrategy.remap(&mut fields)?;

        assert_eq!(fields["username"], "U1");
        assert_eq!(fields["mac"], "U1");
        assert_eq!(fields["pid"], "S1");
        assert_eq!(fields["sid"], "K1");
        Ok(())
    }

    #[test]
    fn test_missing_user_id() {
        let mut fields = Map::new();
        let err = RainwiseStrategy.remap(&mut fields).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField { vendor: Vendor::Rainwise, field: "user_id" }
        ));
    }
}
