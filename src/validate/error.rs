use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Vendor was not specified. Check entry for station with id {station} in the station_info table.")]
    VendorMissing { station: String },

    #[error("Station identifier is None")]
    IdentifierMissing,

    #[error("Station identifier is empty")]
    IdentifierEmpty,

    #[error("Start date is after the end date ({start} > {end})")]
    InvalidWindow {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("Poll window was not resolved before validation")]
    WindowMissing,

    #[error("Field '{field}' is not a valid timestamp: {value}")]
    MalformedWindowField { field: &'static str, value: String },
}
