//! SOQL query result type.

use serde::{Deserialize, Serialize};

/// One page of a SOQL query.
///
/// When `done` is false, `next_records_url` is the relative URL to pass to
/// `query_more` for the next page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub total_size: u64,
    pub done: bool,
    pub next_records_url: Option<String>,
    pub records: Vec<T>,
}

impl<T> QueryResult<T> {
    /// Returns true if more pages are available.
    pub fn has_more(&self) -> bool {
        !self.done && self.next_records_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_query_result_pages() {
        let first: QueryResult<Value> = serde_json::from_value(json!({
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v58.0/query/01gxx-2000",
            "records": [{"Id": "001A"}, {"Id": "001B"}]
        }))
        .unwrap();
        assert!(first.has_more());
        assert_eq!(first.records.len(), 2);

        let last: QueryResult<Value> = serde_json::from_value(json!({
            "totalSize": 3,
            "done": true,
            "records": [{"Id": "001C"}]
        }))
        .unwrap();
        assert!(!last.has_more());
        assert!(last.next_records_url.is_none());
    }
}
