//! Org limits and record counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the `limits` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitInfo {
    #[serde(rename = "Max")]
    pub max: i64,
    #[serde(rename = "Remaining")]
    pub remaining: i64,
}

impl LimitInfo {
    /// Amount consumed so far.
    pub fn used(&self) -> i64 {
        self.max - self.remaining
    }
}

/// Org limits keyed by name, e.g. `DailyApiRequests`.
///
/// Nested per-application breakdowns some limits carry are not kept.
pub type Limits = BTreeMap<String, LimitInfo>;

/// Result of `limits/recordCount`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordCounts {
    #[serde(rename = "sObjects", default)]
    pub sobjects: Vec<RecordCount>,
}

impl RecordCounts {
    /// Count for one object, if the server reported it.
    pub fn get(&self, sobject: &str) -> Option<i64> {
        self.sobjects
            .iter()
            .find(|c| c.name == sobject)
            .map(|c| c.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordCount {
    pub name: String,
    pub count: i64,
}
