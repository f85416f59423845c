//! Hand-off of successful polls to storage.

pub mod error;
pub mod publisher;
pub mod sink;
