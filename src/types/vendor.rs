//! Defines the [`Vendor`] tag that selects which normalization and window rules
//! apply to a poll.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A weather-station data provider reachable through the vendor client.
///
/// The tag is matched case-insensitively when parsed from an inbound request
/// and is always written back in lowercase, which is the form the vendor client
/// expects. Tags the poller has no built-in rules for parse to [`Vendor::Other`]
/// and are passed through to the vendor client unchanged; rules for them can be
/// added through [`crate::VendorRegistry::register`].
///
/// # Examples
///
/// ```
/// use station_poller::Vendor;
///
/// let vendor: Vendor = "Davis".parse().unwrap();
/// assert_eq!(vendor, Vendor::Davis);
/// assert_eq!(vendor.to_string(), "davis");
///
/// let other: Vendor = "Ambient".parse().unwrap();
/// assert_eq!(other, Vendor::Other("ambient".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Vendor {
    /// METER Group ZENTRA Cloud.
    Zentra,
    /// Davis WeatherLink. Rejects windows wider than 24 hours.
    Davis,
    /// Rainwise Net.
    Rainwise,
    /// Campbell Scientific Konect.
    Campbell,
    /// Onset HOBOlink.
    Onset,
    /// Any other tag, stored lowercase.
    Other(String),
}

impl Vendor {
    /// Every vendor with built-in rules.
    pub const ALL: [Vendor; 5] = [
        Vendor::Zentra,
        Vendor::Davis,
        Vendor::Rainwise,
        Vendor::Campbell,
        Vendor::Onset,
    ];

    /// The lowercase tag used on the wire.
    pub fn tag(&self) -> &str {
        match self {
            Vendor::Zentra => "zentra",
            Vendor::Davis => "davis",
            Vendor::Rainwise => "rainwise",
            Vendor::Campbell => "campbell",
            Vendor::Onset => "onset",
            Vendor::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Vendor {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Ok(Vendor::ALL
            .into_iter()
            .find(|vendor| vendor.tag() == wanted)
            .unwrap_or_else(|| Vendor::Other(wanted)))
    }
}

impl From<String> for Vendor {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(vendor) => vendor,
            Err(never) => match never {},
        }
    }
}

impl From<Vendor> for String {
    fn from(vendor: Vendor) -> Self {
        vendor.tag().to_string()
    }
}
