//! Salesforce Tooling API client.
//!
//! This client wraps `SalesforceClient` from `sfkit-client`; every path is
//! under `/services/data/v{version}/tooling/`.

use sfkit_client::{ClientConfig, Result, SalesforceClient};

mod query;
mod sobject;

/// Salesforce Tooling API client.
///
/// # Example
///
/// ```rust,ignore
/// use sfkit_tooling::{CustomField, ToolingClient};
///
/// let client = ToolingClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// let classes = client
///     .query::<serde_json::Value>("SELECT Id, Name FROM ApexClass")
///     .await?;
///
/// let field = CustomField::new("Account.Region__c", "Region", "Text").with_length(80);
/// let created = client.create_custom_field(&field).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ToolingClient {
    client: SalesforceClient,
}

impl ToolingClient {
    /// Create a new Tooling API client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self { client })
    }

    /// Create a new Tooling API client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self { client })
    }

    /// Create a Tooling client from an existing SalesforceClient.
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

impl From<SalesforceClient> for ToolingClient {
    fn from(client: SalesforceClient) -> Self {
        Self::from_client(client)
    }
}
