use crate::normalize::error::NormalizeError;
use crate::types::params::STATION_FIELD;
use crate::types::vendor::Vendor;
use crate::vendors::{copy_field, VendorStrategy};
use log::debug;
use serde_json::{Map, Value};

const STATION_ID_FIELD: &str = "station_id";

/// Konect addresses stations by `station_id`/`station_lid` and takes the
/// password as `user_passwd`. Either `sn` or `station_id` may carry the
/// identifier; a request with neither is left for validation to reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampbellStrategy;

impl VendorStrategy for CampbellStrategy {
    fn remap(&self, fields: &mut Map<String, Value>) -> Result<(), NormalizeError> {
        if has_value(fields, STATION_FIELD) {
            copy_field(fields, Vendor::Campbell, STATION_FIELD, STATION_ID_FIELD)?;
        } else if has_value(fields, STATION_ID_FIELD) {
            debug!("campbell request keyed by station_id, filling sn");
            copy_field(fields, Vendor::Campbell, STATION_ID_FIELD, STATION_FIELD)?;
        }
        copy_field(fields, Vendor::Campbell, "client_id", "station_lid")?;
        copy_field(fields, Vendor::Campbell, "password", "user_passwd")
    }
}

fn has_value(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_remap_from_sn() -> Result<(), NormalizeError> {
        let mut fields = fields(json!({"sn": "CS-1", "client_id": "L9", "password": "pw"}));
        CampbellStrategy.remap(&mut fields)?;

        assert_eq!(fields["station_id"], "CS-1");
        assert_eq!(fields["station_lid"], "L9");
        assert_eq!(fields["user_passwd"], "pw");
        Ok(())
    }

    #[test]
    fn test_remap_from_station_id() -> Result<(), NormalizeError> {
        let mut fields = fields(json!({"station_id": "CS-2", "client_id": "L9", "password": "pw"}));
        CampbellStrategy.remap(&mut fields)?;
        assert_eq!(fields["sn"], "CS-2");
        Ok(())
    }

    #[test]
    fn test_no_identifier_is_left_alone() -> Result<(), NormalizeError> {
        let mut fields = fields(json!({"client_id": "L9", "password": "pw"}));
        CampbellStrategy.remap(&mut fields)?;
        assert!(!fields.contains_key("sn"));
        assert!(!fields.contains_key("station_id"));
        Ok(())
    }

    #[test]
    fn test_missing_client_id() {
        let mut fields = fields(json!({"sn": "CS-1", "password": "pw"}));
        let err = CampbellStrategy.remap(&mut fields).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField { field: "client_id", .. }));
    }
}
