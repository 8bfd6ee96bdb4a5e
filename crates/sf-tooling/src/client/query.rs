use serde::de::DeserializeOwned;
use tracing::instrument;

use sfkit_client::decode::decode_json;
use sfkit_client::Result;
use sfkit_rest::QueryResult;

impl super::ToolingClient {
    /// Execute a SOQL query against the Tooling API and return the first page.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let request = self
            .client
            .get(&self.client.tooling_url("query/"))
            .query("q", soql);
        let response = self.client.send(request).await?;
        decode_json(&response, &[200])
    }

    /// Fetch the next page of a Tooling query.
    #[instrument(skip(self))]
    pub async fn query_more<T: DeserializeOwned>(
        &self,
        next_records_url: &str,
    ) -> Result<QueryResult<T>> {
        self.client.get_json(next_records_url).await
    }
}
