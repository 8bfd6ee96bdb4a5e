//! Metadata API client.

use tracing::instrument;

use sfkit_client::decode::decode_soap;
use sfkit_client::xml::escape;
use sfkit_client::{ClientConfig, DecodeFailure, Error, Result, SalesforceClient, XmlElement};

mod deploy;
mod retrieve;
mod xml_helpers;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Salesforce Metadata API (SOAP) client.
///
/// Shares the transport and credentials of a [`SalesforceClient`]. The SOAP
/// endpoint is `{instance}/services/Soap/m/{version}`, with the version taken
/// from the client unless a retrieve request names its own.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: SalesforceClient,
}

impl MetadataClient {
    /// Create a new Metadata API client from instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: SalesforceClient::new(instance_url, access_token)?,
        })
    }

    /// Create a new Metadata API client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            client: SalesforceClient::with_config(instance_url, access_token, config)?,
        })
    }

    /// Create a Metadata API client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self { client }
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Wrap an operation element in an envelope carrying the session header.
    pub(crate) fn envelope(&self, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{SOAP_ENVELOPE_NS}" xmlns:met="{METADATA_NS}">
  <soapenv:Header>
    <met:SessionHeader>
      <met:sessionId>{session_id}</met:sessionId>
    </met:SessionHeader>
  </soapenv:Header>
  <soapenv:Body>
    {body}
  </soapenv:Body>
</soapenv:Envelope>"#,
            session_id = escape(self.client.access_token()),
        )
    }

    /// Send one SOAP operation and assemble its result.
    ///
    /// Faults and unexpected statuses are classified by the decoder; a result
    /// that `parse` cannot assemble is a decode failure carrying the raw body.
    #[instrument(skip(self, body, parse), fields(api_version = %api_version))]
    pub(crate) async fn call<T>(
        &self,
        operation: &str,
        api_version: &str,
        body: &str,
        parse: impl FnOnce(&XmlElement) -> std::result::Result<T, DecodeFailure>,
    ) -> Result<T> {
        let request = self
            .client
            .post(&self.client.metadata_url(api_version))
            .header("SOAPAction", "\"\"")
            .xml(self.envelope(body));

        let response = self.client.send(request).await?;
        let result = decode_soap(&response, &[200], operation)?;
        parse(&result).map_err(|failure| Error::decode(failure, response.status(), response.text()))
    }
}

impl From<SalesforceClient> for MetadataClient {
    fn from(client: SalesforceClient) -> Self {
        Self::from_client(client)
    }
}
