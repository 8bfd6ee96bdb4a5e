//! Salesforce REST API client.
//!
//! This client wraps `SalesforceClient` from `sfkit-client` and provides
//! typed methods for record CRUD, describe, composite batches, SOQL query,
//! record counts and limits.

use sfkit_client::{ClientConfig, Error, ErrorKind, Result, SalesforceClient};

mod composite;
mod crud;
mod limits;
mod query;

/// Salesforce REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use sfkit_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// let accounts: Vec<serde_json::Value> = client.query_all("SELECT Id, Name FROM Account").await?;
/// let created = client.create("Account", &json!({"Name": "New Account"})).await?;
/// client.update("Account", &created.id, &json!({"Name": "Updated"})).await?;
/// client.delete("Account", &created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesforceRestClient {
    client: SalesforceClient,
}

impl SalesforceRestClient {
    /// Create a new REST client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self { client })
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self { client })
    }

    /// Create a REST client from an existing SalesforceClient.
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
}

impl From<SalesforceClient> for SalesforceRestClient {
    fn from(client: SalesforceClient) -> Self {
        Self::from_client(client)
    }
}

/// An sObject or field API name: a letter, then letters, digits or `_`.
fn is_safe_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A 15 or 18 character record ID.
fn is_valid_id(id: &str) -> bool {
    matches!(id.len(), 15 | 18) && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Build `sobjects/{type}` or `sobjects/{type}/{id}`, rejecting names and IDs
/// that would change the shape of the URL.
pub(crate) fn sobject_path(sobject: &str, id: Option<&str>) -> Result<String> {
    if !is_safe_name(sobject) {
        return Err(Error::new(ErrorKind::InvalidUrl(format!(
            "invalid sObject name: {sobject}"
        ))));
    }
    match id {
        Some(id) if !is_valid_id(id) => Err(Error::new(ErrorKind::InvalidUrl(format!(
            "invalid record ID: {id}"
        )))),
        Some(id) => Ok(format!("sobjects/{sobject}/{id}")),
        None => Ok(format!("sobjects/{sobject}")),
    }
}
