use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the vendor client returns for one poll.
///
/// `raw` is the vendor's original JSON payload; `parsed` is the client's
/// normalized form of it. Both are forwarded untouched to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub raw: Value,
    #[serde(alias = "transformed")]
    pub parsed: Value,
}

impl Reading {
    pub fn new(raw: Value, parsed: Value) -> Self {
        Self { raw, parsed }
    }
}
