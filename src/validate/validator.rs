//! Checks a parameter set before anything is sent to a vendor.
//!
//! [`validate`] runs the checks in order and stops at the first violation. The
//! individual checks are public so the poller can run the identity checks on the
//! raw request before it needs the station key for the watermark lookup.

use crate::types::params::{NormalizedParameterSet, STATION_FIELD, VENDOR_FIELD};
use crate::types::poll_window::PollWindow;
use crate::types::vendor::Vendor;
use crate::validate::error::ValidationError;
use serde_json::Value;

/// Validates a normalized parameter set: vendor, then station identifier, then window.
///
/// # Errors
///
/// * [`ValidationError::VendorMissing`]
/// * [`ValidationError::IdentifierMissing`] / [`ValidationError::IdentifierEmpty`]
/// * [`ValidationError::WindowMissing`] / [`ValidationError::InvalidWindow`]
pub fn validate(params: &NormalizedParameterSet) -> Result<(), ValidationError> {
    check_vendor(params.get(VENDOR_FIELD), params.get(STATION_FIELD))?;
    check_identifier(params.get(STATION_FIELD))?;
    check_window(params.window())
}

/// Parses the vendor field. `station` only feeds the error message.
///
/// Any non-blank tag is accepted; tags without built-in rules become
/// [`Vendor::Other`] and are left for the vendor client to judge.
pub fn check_vendor(
    vendor: Option<&Value>,
    station: Option<&Value>,
) -> Result<Vendor, ValidationError> {
    match vendor {
        Some(Value::String(tag)) if !tag.trim().is_empty() => Ok(Vendor::from(tag.clone())),
        _ => Err(ValidationError::VendorMissing {
            station: describe_station(station),
        }),
    }
}

/// Extracts the station identifier, telling an absent/null value apart from an
/// empty one. Numeric identifiers are accepted and stringified.
pub fn check_identifier(station: Option<&Value>) -> Result<String, ValidationError> {
    match station {
        Some(Value::String(id)) if id.trim().is_empty() => Err(ValidationError::IdentifierEmpty),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(ValidationError::IdentifierMissing),
    }
}

pub fn check_window(window: Option<&PollWindow>) -> Result<(), ValidationError> {
    match window {
        None => Err(ValidationError::WindowMissing),
        Some(window) if !window.is_ordered() => Err(ValidationError::InvalidWindow {
            start: window.start,
            end: window.end,
        }),
        Some(_) => Ok(()),
    }
}

fn describe_station(station: Option<&Value>) -> String {
    match station {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => "None".to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{json, Map};

    fn window() -> PollWindow {
        let end = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        PollWindow::ending_at(end, Duration::hours(24))
    }

    fn params(fields: Value) -> NormalizedParameterSet {
        let fields: Map<String, Value> = fields.as_object().cloned().unwrap_or_default();
        NormalizedParameterSet::from_fields(fields).with_window(window())
    }

    #[test]
    fn test_valid_params_pass() {
        let params = params(json!({"vendor": "zentra", "sn": "z6-12564", "token": "T"}));
        assert_eq!(validate(&params), Ok(()));
    }

    #[test]
    fn test_empty_and_null_vendor() {
        for vendor in [json!(""), json!(null), json!("   ")] {
            let params = params(json!({"vendor": vendor, "sn": "z6-12564"}));
            assert_eq!(
                validate(&params),
                Err(ValidationError::VendorMissing {
                    station: "z6-12564".into()
                })
            );
        }
        let params = params(json!({"sn": "z6-12564"}));
        let err = validate(&params).unwrap_err();
        assert!(err.to_string().contains("Vendor was not specified"));
    }

    #[test]
    fn test_unlisted_vendor_is_passed_through() {
        let params = params(json!({"vendor": "Ambient", "sn": "z6-12564"}));
        assert_eq!(validate(&params), Ok(()));
        assert_eq!(
            check_vendor(params.get(VENDOR_FIELD), None),
            Ok(Vendor::Other("ambient".into()))
        );
    }

    #[test]
    fn test_null_and_empty_identifier_are_distinct() {
        let null_id = params(json!({"vendor": "zentra", "sn": null}));
        let missing_id = params(json!({"vendor": "zentra"}));
        let empty_id = params(json!({"vendor": "zentra", "sn": ""}));

        assert_eq!(validate(&null_id), Err(ValidationError::IdentifierMissing));
        assert_eq!(validate(&missing_id), Err(ValidationError::IdentifierMissing));
        assert_eq!(validate(&empty_id), Err(ValidationError::IdentifierEmpty));
        assert!(validate(&null_id).unwrap_err().to_string().contains("identifier is None"));
        assert!(validate(&empty_id).unwrap_err().to_string().contains("identifier is empty"));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let end = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let inverted = PollWindow::new(end + Duration::seconds(86_400), end);
        let params = params(json!({"vendor": "zentra", "sn": "z6-12564", "token": "T"}))
            .with_window(inverted);

        let err = validate(&params).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidWindow {
                start: inverted.start,
                end: inverted.end
            }
        );
        assert!(err.to_string().contains("Start date is after the end date"));
    }

    #[test]
    fn test_missing_window() {
        let fields = json!({"vendor": "zentra", "sn": "z6-12564"});
        let params = NormalizedParameterSet::from_fields(fields.as_object().cloned().unwrap_or_default());
        assert_eq!(validate(&params), Err(ValidationError::WindowMissing));
    }

    #[test]
    fn test_numeric_identifier() {
        assert_eq!(check_identifier(Some(&json!(12564))), Ok("12564".to_string()));
    }
}
