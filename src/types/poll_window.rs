//! The `[start, end)` time range requested from a vendor in one poll cycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How far back a poll reaches, in seconds, when a station has never been polled.
pub const DEFAULT_LOOKBACK_SECS: i64 = 86_400;

pub fn default_lookback() -> Duration {
    Duration::seconds(DEFAULT_LOOKBACK_SECS)
}

/// A poll window in UTC.
///
/// Windows produced by [`crate::WindowResolver`] always satisfy `start <= end`.
/// Windows supplied by a caller are not checked on construction; the
/// [`crate::validate()`] pass rejects inverted ones before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PollWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A window of length `span` that ends at `end`.
    pub fn ending_at(end: DateTime<Utc>, span: Duration) -> Self {
        Self {
            start: end - span,
            end,
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Shrinks the window so it spans at most `max_span`, keeping `end` fixed.
    pub fn clamped_to(self, max_span: Duration) -> Self {
        if self.span() > max_span {
            Self::ending_at(self.end, max_span)
        } else {
            self
        }
    }
}
