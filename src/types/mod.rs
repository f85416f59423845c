pub mod into_utc_trait;
pub mod outcome;
pub mod params;
pub mod poll_window;
pub mod reading;
pub mod vendor;
