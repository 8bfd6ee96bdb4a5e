//! Composite and sObject collection types.

use serde::{Deserialize, Serialize};

use crate::sobject::SalesforceError;

/// Body of `composite/sobjects` create and update calls.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionRequest {
    #[serde(rename = "allOrNone")]
    pub all_or_none: bool,
    pub records: Vec<serde_json::Value>,
}

impl CollectionRequest {
    /// All-or-nothing request with `attributes.type` set on every record.
    ///
    /// Records that do not serialize to a JSON object are rejected.
    pub fn typed<T: Serialize>(
        sobject: &str,
        records: &[T],
    ) -> Result<Self, serde_json::Error> {
        let records = records
            .iter()
            .map(|record| {
                let mut value = serde_json::to_value(record)?;
                let map = value.as_object_mut().ok_or_else(|| {
                    <serde_json::Error as serde::ser::Error>::custom("record must be a JSON object")
                })?;
                map.insert(
                    "attributes".to_string(),
                    serde_json::json!({ "type": sobject }),
                );
                Ok(value)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            all_or_none: true,
            records,
        })
    }
}

/// Per-record result of a collection create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompositeResult {
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// A composite request containing multiple subrequests.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeRequest {
    #[serde(rename = "allOrNone")]
    pub all_or_none: bool,
    #[serde(rename = "compositeRequest")]
    pub subrequests: Vec<CompositeSubrequest>,
}

/// A single subrequest within a composite request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeSubrequest {
    pub method: String,
    pub url: String,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Response from a composite request.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeResponse {
    #[serde(rename = "compositeResponse")]
    pub responses: Vec<CompositeSubresponse>,
}

impl CompositeResponse {
    /// Subresponses whose status is not 2xx.
    pub fn failures(&self) -> impl Iterator<Item = &CompositeSubresponse> {
        self.responses
            .iter()
            .filter(|r| !(200..300).contains(&r.http_status_code))
    }
}

/// Response from a single subrequest.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeSubresponse {
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(rename = "httpHeaders", default)]
    pub http_headers: serde_json::Value,
    #[serde(rename = "httpStatusCode")]
    pub http_status_code: u16,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
}
