use tracing::instrument;

use sfkit_client::decode::decode_json;
use sfkit_client::Result;

use super::sobject_path;
use crate::limits::{Limits, RecordCounts};

impl super::SalesforceRestClient {
    /// Get API limits for the org.
    #[instrument(skip(self))]
    pub async fn limits(&self) -> Result<Limits> {
        self.client.rest_get("limits").await
    }

    /// Get approximate record counts for the given objects.
    #[instrument(skip(self))]
    pub async fn record_counts(&self, sobjects: &[&str]) -> Result<RecordCounts> {
        for sobject in sobjects {
            sobject_path(sobject, None)?;
        }
        let request = self
            .client
            .get(&self.client.rest_url("limits/recordCount"))
            .query("sObjects", sobjects.join(","));
        let response = self.client.send(request).await?;
        decode_json(&response, &[200])
    }
}
