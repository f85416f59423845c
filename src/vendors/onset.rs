use crate::normalize::error::NormalizeError;
use crate::types::vendor::Vendor;
use crate::vendors::VendorStrategy;
use serde_json::{Map, Value};

const SENSOR_SN_FIELD: &str = "sensor_sn";

/// HOBOlink wants `sensor_sn` as a mapping. Callers often send it as a JSON
/// string, which is decoded here with a strict JSON parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnsetStrategy;

impl VendorStrategy for OnsetStrategy {
    fn remap(&self, fields: &mut Map<String, Value>) -> Result<(), NormalizeError> {
        let Some(Value::String(encoded)) = fields.get(SENSOR_SN_FIELD) else {
            return match fields.get(SENSOR_SN_FIELD) {
                None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
                Some(_) => Err(not_mapping()),
            };
        };
        let decoded: Value =
            serde_json::from_str(encoded).map_err(|source| NormalizeError::MalformedStructuredField {
                vendor: Vendor::Onset,
                field: SENSOR_SN_FIELD,
                source,
            })?;
        if !decoded.is_object() {
            return Err(not_mapping());
        }
        fields.insert(SENSOR_SN_FIELD.to_string(), decoded);
        Ok(())
    }
}

fn not_mapping() -> NormalizeError {
    NormalizeError::StructuredFieldNotMapping {
        vendor: Vendor::Onset,
        field: SENSOR_SN_FIELD,
    }
}
