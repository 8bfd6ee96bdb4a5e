//! Bulk API 2.0 query job client.
//!
//! Each method is one request. Looping until a job finishes or until the
//! locator chain ends is available through [`BulkApiClient::wait_for_query_job`]
//! and [`BulkApiClient::get_all_results_parsed`], which callers opt into.

use tracing::{debug, instrument};

use sfkit_client::decode::{decode_csv, decode_json, expect_status};
use sfkit_client::{
    collect_pages, normalize_locator, poll_until_terminal, ClientConfig, DecodeFailure, Error,
    HttpRequest, OperationHandle, OperationKind, OperationStatus, PollPolicy, Response, Result,
    ResultPage, Row, SalesforceClient,
};

use crate::types::*;

/// Salesforce Bulk API 2.0 client for query jobs.
///
/// # Example
///
/// ```rust,ignore
/// use sfkit_bulk::BulkApiClient;
/// use sfkit_client::PollPolicy;
///
/// let client = BulkApiClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// let handle = client.submit_query("SELECT Id, Name FROM Account").await?;
/// let status = client.wait_for_query_job(&handle.id, &PollPolicy::default()).await?;
/// if status.success {
///     let rows = client.get_all_results_parsed(&handle.id, 10_000).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BulkApiClient {
    client: SalesforceClient,
}

impl BulkApiClient {
    /// Create a new Bulk API client.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self { client })
    }

    /// Create a new Bulk API client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self { client })
    }

    /// Create a Bulk API client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self { client }
    }

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.client.instance_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.client.bulk_url("query"), job_id)
    }

    fn results_request(&self, job_id: &str, locator: Option<&str>, max_records: u32) -> HttpRequest {
        let request = self
            .client
            .get(&format!("{}/results", self.job_url(job_id)))
            .header("Accept", "text/csv")
            .query("maxRecords", max_records.to_string());
        match locator {
            Some(locator) => request.query("locator", locator),
            None => request,
        }
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Submit a SOQL query as a Bulk API 2.0 query job.
    pub async fn submit_query(&self, soql: &str) -> Result<OperationHandle> {
        self.submit_query_job(CreateQueryJobRequest::new(soql)).await
    }

    /// Submit a query job request.
    ///
    /// Both 200 and 201 are accepted as success. The returned handle is always
    /// `Queued` and not done; only a poll reports progress.
    #[instrument(skip(self, request))]
    pub async fn submit_query_job(&self, request: CreateQueryJobRequest) -> Result<OperationHandle> {
        let request = self.client.post(&self.client.bulk_url("query")).json(&request)?;
        let response = self.client.send(request).await?;
        let job = decode_job(&response, &[200, 201])?;
        debug!(job_id = %job.id, state = job.state.as_str(), "Query job created");
        Ok(OperationHandle::submitted(job.id, OperationKind::BulkQuery))
    }

    // =========================================================================
    // Poll
    // =========================================================================

    /// Get the raw job info.
    #[instrument(skip(self))]
    pub async fn get_query_job(&self, job_id: &str) -> Result<QueryJob> {
        let response = self.client.send(self.client.get(&self.job_url(job_id))).await?;
        decode_job(&response, &[200])
    }

    /// Poll a query job once.
    ///
    /// An unknown job ID fails with a 404 `UnexpectedStatus`
    /// (`Error::is_not_found`).
    pub async fn poll_query_job(&self, job_id: &str) -> Result<OperationStatus<QueryJob>> {
        Ok(self.get_query_job(job_id).await?.into_status())
    }

    /// Poll until the job reaches a terminal state.
    pub async fn wait_for_query_job(
        &self,
        job_id: &str,
        policy: &PollPolicy,
    ) -> Result<OperationStatus<QueryJob>> {
        poll_until_terminal(|| self.poll_query_job(job_id), policy).await
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Fetch one page of results as raw CSV.
    ///
    /// The next locator comes from the `Sforce-Locator` header; `"null"` or an
    /// empty value ends the stream.
    #[instrument(skip(self))]
    pub async fn get_query_results_raw(
        &self,
        job_id: &str,
        locator: Option<&str>,
        max_records: u32,
    ) -> Result<QueryResults> {
        let response = self
            .client
            .send(self.results_request(job_id, locator, max_records))
            .await?;
        expect_status(&response, &[200])?;

        Ok(QueryResults {
            locator: normalize_locator(response.sforce_locator()),
            csv_data: response.text(),
        })
    }

    /// Fetch one page of results parsed into rows keyed by header.
    ///
    /// An empty body is `EmptyPayload` and a row with the wrong column count
    /// is `MalformedRow`.
    #[instrument(skip(self))]
    pub async fn get_query_results(
        &self,
        job_id: &str,
        locator: Option<&str>,
        max_records: u32,
    ) -> Result<ResultPage<Row>> {
        let response = self
            .client
            .send(self.results_request(job_id, locator, max_records))
            .await?;
        let rows = decode_csv(&response, &[200])?;
        Ok(ResultPage::new(rows, response.sforce_locator()))
    }

    /// Follow the locator chain from the first page and collect every row.
    pub async fn get_all_results_parsed(&self, job_id: &str, max_records: u32) -> Result<Vec<Row>> {
        collect_pages(None, |locator| async move {
            self.get_query_results(job_id, locator.as_deref(), max_records)
                .await
        })
        .await
    }

    // =========================================================================
    // Abort / Delete
    // =========================================================================

    /// Abort a query job.
    ///
    /// Aborting a job that already finished is passed through to the server
    /// unchanged.
    #[instrument(skip(self))]
    pub async fn abort_query_job(&self, job_id: &str) -> Result<QueryJob> {
        let request = self
            .client
            .patch(&self.job_url(job_id))
            .json(&UpdateJobStateRequest::abort())?;
        let response = self.client.send(request).await?;
        decode_job(&response, &[200])
    }

    /// Delete a query job and its results.
    #[instrument(skip(self))]
    pub async fn delete_query_job(&self, job_id: &str) -> Result<()> {
        self.client.delete_request(&self.job_url(job_id), &[204]).await
    }
}

/// Decode job info; a `state` outside the known vocabulary is `UnknownValue`.
fn decode_job(response: &Response, success: &[u16]) -> Result<QueryJob> {
    let value: serde_json::Value = decode_json(response, success)?;
    if let Some(label) = value.get("state").and_then(serde_json::Value::as_str) {
        label
            .parse::<JobState>()
            .map_err(|failure| Error::decode(failure, response.status(), response.text()))?;
    }
    serde_json::from_value(value).map_err(|e| {
        Error::decode(
            DecodeFailure::Json(e.to_string()),
            response.status(),
            response.text(),
        )
    })
}

impl From<SalesforceClient> for BulkApiClient {
    fn from(client: SalesforceClient) -> Self {
        Self::from_client(client)
    }
}
