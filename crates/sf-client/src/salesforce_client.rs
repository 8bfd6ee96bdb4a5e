//! High-level Salesforce client with typed HTTP methods.
//!
//! This module provides `SalesforceClient`, which combines credentials with
//! a shared transport and provides typed JSON methods for API interactions.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Sensitive parameters are skipped in tracing spans

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::decode::{decode_json, expect_status};
use crate::error::{Error, ErrorKind, Result};
use crate::request::HttpRequest;
use crate::response::Response;
use crate::transport::{HttpTransport, Transport};
use crate::DEFAULT_API_VERSION;

/// High-level Salesforce API client.
///
/// Holds the instance URL, access token and API version next to an
/// `Arc<dyn Transport>`. Cloning is cheap and every clone shares the same
/// transport, so one connection pool serves all API surfaces built on it.
///
/// Every request goes through [`send`](Self::send), which refuses to touch
/// the network when the token or instance URL is empty.
///
/// # Example
///
/// ```rust,ignore
/// use sfkit_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://na1.salesforce.com", token)?;
/// let limits: serde_json::Value = client.rest_get("limits").await?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    transport: Arc<dyn Transport>,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a client over a new default [`HttpTransport`].
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a client over a new [`HttpTransport`] with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            instance_url,
            access_token,
        ))
    }

    /// Create a client over a caller-owned transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the API version (e.g., "58.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The shared transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fail with `MissingCredentials` if the token or instance URL is empty.
    pub fn ensure_credentials(&self) -> Result<()> {
        if self.access_token.trim().is_empty() || self.instance_url.trim().is_empty() {
            return Err(Error::new(ErrorKind::MissingCredentials));
        }
        Ok(())
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `/`, it's appended to the instance URL.
    /// Otherwise, it's assumed to be a full URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("sobjects/Account")` -> `/services/data/v58.0/sobjects/Account`
    pub fn rest_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url, self.api_version, path
        )
    }

    /// Build the Tooling API URL for a path.
    pub fn tooling_url(&self, path: &str) -> String {
        self.rest_url(&format!("tooling/{}", path.trim_start_matches('/')))
    }

    /// Build the Bulk API 2.0 URL for a path.
    pub fn bulk_url(&self, path: &str) -> String {
        self.rest_url(&format!("jobs/{}", path.trim_start_matches('/')))
    }

    /// Build the Metadata API SOAP endpoint for an API version.
    pub fn metadata_url(&self, api_version: &str) -> String {
        format!("{}/services/Soap/m/{}", self.instance_url, api_version)
    }

    // =========================================================================
    // Base HTTP Methods (with authentication)
    // =========================================================================

    /// Create a GET request with authentication.
    pub fn get(&self, url: &str) -> HttpRequest {
        HttpRequest::get(self.url(url)).bearer_auth(&self.access_token)
    }

    /// Create a POST request with authentication.
    pub fn post(&self, url: &str) -> HttpRequest {
        HttpRequest::post(self.url(url)).bearer_auth(&self.access_token)
    }

    /// Create a PATCH request with authentication.
    pub fn patch(&self, url: &str) -> HttpRequest {
        HttpRequest::patch(self.url(url)).bearer_auth(&self.access_token)
    }

    /// Create a DELETE request with authentication.
    pub fn delete(&self, url: &str) -> HttpRequest {
        HttpRequest::delete(self.url(url)).bearer_auth(&self.access_token)
    }

    /// Send a request through the transport after the credentials check.
    ///
    /// The response is returned whatever its status; callers decode it.
    pub async fn send(&self, request: HttpRequest) -> Result<Response> {
        self.ensure_credentials()?;
        self.transport.send(request).await
    }

    // =========================================================================
    // Typed JSON Methods
    // =========================================================================

    /// GET with a JSON response; success is 200.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(self.get(url)).await?;
        decode_json(&response, &[200])
    }

    /// GET request to REST API with JSON response.
    pub async fn rest_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json(&self.rest_url(path)).await
    }

    /// GET request to Tooling API with JSON response.
    pub async fn tooling_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json(&self.tooling_url(path)).await
    }

    /// POST a JSON body and decode the JSON response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        success: &[u16],
    ) -> Result<T> {
        self.ensure_credentials()?;
        let response = self.send(self.post(url).json(body)?).await?;
        decode_json(&response, success)
    }

    /// PATCH a JSON body, expecting no response body.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        success: &[u16],
    ) -> Result<()> {
        self.ensure_credentials()?;
        let response = self.send(self.patch(url).json(body)?).await?;
        expect_status(&response, success)
    }

    /// DELETE, expecting no response body.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn delete_request(&self, url: &str, success: &[u16]) -> Result<()> {
        let response = self.send(self.delete(url)).await?;
        expect_status(&response, success)
    }
}
