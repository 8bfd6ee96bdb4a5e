//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use sfkit_client::{ClientConfig, SalesforceClient, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};

/// Trait for Salesforce credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token.
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "58.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().trim().is_empty() && !self.access_token().trim().is_empty()
    }

    /// Build a [`SalesforceClient`] bound to these credentials.
    fn to_client(&self) -> Result<SalesforceClient> {
        self.to_client_with_config(ClientConfig::default())
    }

    /// Build a [`SalesforceClient`] with custom HTTP configuration.
    ///
    /// Fails with `InvalidCredentials` when the instance URL or token is blank.
    fn to_client_with_config(&self, config: ClientConfig) -> Result<SalesforceClient> {
        if !self.is_valid() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "instance URL and access token are required".to_string(),
            )));
        }
        let client = SalesforceClient::with_config(self.instance_url(), self.access_token(), config)?;
        Ok(client.with_api_version(self.api_version()))
    }
}

/// Standard Salesforce credentials implementation.
///
/// Sensitive fields (access_token, refresh_token) are redacted in Debug output
/// to prevent accidental exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    access_token: String,
    api_version: String,
    refresh_token: Option<String>,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
            refresh_token: None,
        }
    }

    /// Create credentials with a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Get the refresh token if available.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Set a new access token (e.g., after refresh).
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
    }

    /// Change the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_INSTANCE_URL` or `SALESFORCE_INSTANCE_URL`
    /// - `SF_ACCESS_TOKEN` or `SALESFORCE_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "58.0")
    /// - `SF_REFRESH_TOKEN` or `SALESFORCE_REFRESH_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve each setting from its `SF_` name first, then `SALESFORCE_`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |suffix: &str| {
            lookup(&format!("SF_{suffix}"))
                .or_else(|| lookup(&format!("SALESFORCE_{suffix}")))
                .filter(|value| !value.trim().is_empty())
        };

        let instance_url = var("INSTANCE_URL")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_INSTANCE_URL".to_string())))?;
        let access_token = var("ACCESS_TOKEN")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_ACCESS_TOKEN".to_string())))?;
        let api_version = var("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let mut creds = Self::new(instance_url, access_token, api_version);
        if let Some(rt) = var("REFRESH_TOKEN") {
            creds = creds.with_refresh_token(rt);
        }

        Ok(creds)
    }
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}
