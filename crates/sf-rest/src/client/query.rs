use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use sfkit_client::decode::decode_json;
use sfkit_client::Result;

use crate::query::QueryResult;

impl super::SalesforceRestClient {
    /// Execute a SOQL query and return the first page.
    ///
    /// The query is sent URL-encoded as `q`; values spliced into the WHERE
    /// clause must already be escaped by the caller.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let request = self
            .client
            .get(&self.client.rest_url("query/"))
            .query("q", soql);
        let response = self.client.send(request).await?;
        decode_json(&response, &[200])
    }

    /// Fetch the next page of query results.
    #[instrument(skip(self))]
    pub async fn query_more<T: DeserializeOwned>(
        &self,
        next_records_url: &str,
    ) -> Result<QueryResult<T>> {
        self.client.get_json(next_records_url).await
    }

    /// Execute a SOQL query and follow `nextRecordsUrl` until done.
    #[instrument(skip(self))]
    pub async fn query_all<T: DeserializeOwned>(&self, soql: &str) -> Result<Vec<T>> {
        let mut page = self.query::<T>(soql).await?;
        let mut records = Vec::with_capacity(page.total_size as usize);
        loop {
            records.append(&mut page.records);
            match page.next_records_url.take() {
                Some(next) if !page.done => page = self.query_more(&next).await?,
                _ => break,
            }
        }
        debug!(records = records.len(), "Query exhausted");
        Ok(records)
    }
}
