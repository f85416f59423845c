//! Parameter sets flowing from the inbound request to the vendor client.
//!
//! [`RawParameterSet`] is exactly what the caller sent. [`NormalizedParameterSet`]
//! is the vendor-shaped mapping produced by [`crate::ParameterNormalizer`], carrying
//! the resolved [`PollWindow`] both as typed data and as serialized fields.

use crate::types::into_utc_trait::parse_timestamp;
use crate::types::poll_window::PollWindow;
use crate::types::vendor::Vendor;
use crate::validate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the vendor tag.
pub const VENDOR_FIELD: &str = "vendor";
/// Field carrying the station identifier.
pub const STATION_FIELD: &str = "sn";
/// Field carrying the window start.
pub const START_FIELD: &str = "start_date";
/// Field carrying the window end.
pub const END_FIELD: &str = "end_date";

/// The parameters of an inbound poll request.
///
/// # Examples
///
/// ```
/// use station_poller::RawParameterSet;
///
/// let raw = RawParameterSet::from_json(r#"{"vendor": "zentra", "sn": "z6-12564", "token": "T"}"#).unwrap();
/// assert_eq!(raw.get("token").and_then(|v| v.as_str()), Some("T"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParameterSet(Map<String, Value>);

impl RawParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The window the caller pre-set, if both `start_date` and `end_date` are
    /// present and non-null.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedWindowField`] if either bound is set
    /// but is not a recognizable timestamp.
    pub fn supplied_window(&self) -> Result<Option<PollWindow>, ValidationError> {
        let (Some(start), Some(end)) = (self.non_null(START_FIELD), self.non_null(END_FIELD)) else {
            return Ok(None);
        };
        Ok(Some(PollWindow::new(
            window_bound(START_FIELD, start)?,
            window_bound(END_FIELD, end)?,
        )))
    }

    fn non_null(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }
}

impl From<Map<String, Value>> for RawParameterSet {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn window_bound(field: &'static str, value: &Value) -> Result<chrono::DateTime<chrono::Utc>, ValidationError> {
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| ValidationError::MalformedWindowField {
            field,
            value: value.to_string(),
        })
}

/// A vendor-shaped parameter set, ready for the vendor client.
///
/// Serializes as a flat JSON object of its fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedParameterSet {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(skip)]
    window: Option<PollWindow>,
}

impl NormalizedParameterSet {
    /// Wraps already-shaped fields. No window is attached.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            window: None,
        }
    }

    /// Attaches `window`, writing its bounds as RFC 3339 strings.
    pub fn with_window(mut self, window: PollWindow) -> Self {
        self.fields
            .insert(START_FIELD.to_string(), Value::String(window.start.to_rfc3339()));
        self.fields
            .insert(END_FIELD.to_string(), Value::String(window.end.to_rfc3339()));
        self.window = Some(window);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn window(&self) -> Option<&PollWindow> {
        self.window.as_ref()
    }

    /// The vendor, if the `vendor` field holds a non-blank tag.
    pub fn vendor(&self) -> Option<Vendor> {
        self.fields
            .get(VENDOR_FIELD)
            .and_then(Value::as_str)
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| Vendor::from(tag.to_string()))
    }

    pub fn station(&self) -> Option<&str> {
        self.fields.get(STATION_FIELD).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_supplied_window_requires_both_bounds() -> Result<(), Box<dyn std::error::Error>> {
        let only_start = RawParameterSet::new().with(START_FIELD, "2024-05-01T00:00:00Z");
        assert_eq!(only_start.supplied_window()?, None);

        let null_end = only_start.clone().with(END_FIELD, Value::Null);
        assert_eq!(null_end.supplied_window()?, None);

        let both = only_start.with(END_FIELD, "2024-05-02T00:00:00Z");
        let window = both.supplied_window()?.expect("window should be present");
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
        Ok(())
    }

    #[test]
    fn test_supplied_window_rejects_garbage() {
        let raw = RawParameterSet::new()
            .with(START_FIELD, "last tuesday")
            .with(END_FIELD, "2024-05-02T00:00:00Z");
        let err = raw.supplied_window().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MalformedWindowField { field: START_FIELD, .. }
        ));
    }

    #[test]
    fn test_with_window_writes_fields() {
        let end = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let window = PollWindow::new(end - chrono::Duration::hours(1), end);
        let params = NormalizedParameterSet::default().with_window(window);

        assert_eq!(params.window(), Some(&window));
        assert_eq!(
            params.get(END_FIELD).and_then(Value::as_str),
            Some("2024-05-02T00:00:00+00:00")
        );
    }

    #[test]
    fn test_serializes_flat() -> Result<(), serde_json::Error> {
        let mut fields = Map::new();
        fields.insert("vendor".into(), "zentra".into());
        let params = NormalizedParameterSet::from_fields(fields);
        assert_eq!(serde_json::to_string(&params)?, r#"{"vendor":"zentra"}"#);
        Ok(())
    }
}
