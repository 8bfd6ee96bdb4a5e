//! OAuth 2.0 token grants.
//!
//! - **Username-password** - [`PasswordFlow`]
//! - **Client credentials** - [`ClientCredentialsFlow`]
//! - **Refresh token** - [`OAuthClient::refresh_token`]
//!
//! Every grant is a single form-encoded POST to a token endpoint. Status 200
//! carries a [`TokenResponse`]; anything else is an OAuth error body or an
//! unexpected status.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::credentials::SalesforceCredentials;
use crate::error::{Error, ErrorKind, Result};

/// POST a form to a token endpoint and decode the grant.
async fn request_token(
    http_client: &reqwest::Client,
    token_url: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let body = serde_urlencoded::to_string(params)?;

    let response = http_client
        .post(token_url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .body(body)
        .send()
        .await?;

    let status = response.status().as_u16();
    let text = response.text().await?;
    debug!(status, "token endpoint responded");

    if status != 200 {
        return Err(match serde_json::from_str::<OAuthErrorResponse>(&text) {
            Ok(error) => Error::new(ErrorKind::OAuth {
                error: error.error,
                description: error.error_description,
            }),
            Err(_) => sfkit_client::Error::unexpected_status(status, text).into(),
        });
    }

    Ok(serde_json::from_str(&text)?)
}

/// OAuth 2.0 configuration for a connected app.
///
/// `consumer_secret` is redacted in Debug output.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Consumer key (client_id).
    pub consumer_key: String,
    consumer_secret: Option<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuthConfig {
    /// Create a new OAuth config.
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: None,
        }
    }

    /// Set the consumer secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }
}

/// OAuth client for refreshing Salesforce sessions.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client.
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Get the OAuth config.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchange a refresh token for a new access token at
    /// `{login_url}/services/oauth2/token`.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_token(&self, refresh_token: &str, login_url: &str) -> Result<TokenResponse> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.consumer_key.as_str()),
        ];
        if let Some(secret) = self.config.consumer_secret.as_deref() {
            params.push(("client_secret", secret));
        }

        let token_url = format!(
            "{}/services/oauth2/token",
            login_url.trim_end_matches('/')
        );
        request_token(&self.http_client, &token_url, &params).await
    }
}

/// Username-password grant against a token URL.
#[derive(Clone)]
pub struct PasswordFlow {
    pub client_id: String,
    client_secret: String,
    pub username: String,
    password: String,
    pub token_url: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for PasswordFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordFlow")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl PasswordFlow {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            token_url: token_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Request a token with `grant_type=password`.
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn authenticate(&self) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        request_token(&self.http_client, &self.token_url, &params).await
    }
}

/// Client-credentials grant against a token URL.
#[derive(Clone)]
pub struct ClientCredentialsFlow {
    pub client_id: String,
    client_secret: String,
    pub token_url: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for ClientCredentialsFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsFlow")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl ClientCredentialsFlow {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Request a token with `grant_type=client_credentials`.
    #[instrument(skip(self), fields(client_id = %self.client_id))]
    pub async fn authenticate(&self) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        request_token(&self.http_client, &self.token_url, &params).await
    }
}

/// Token response from OAuth.
///
/// `access_token`, `refresh_token` and `signature` are redacted in Debug
/// output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub instance_url: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Identity URL of the authenticated user.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("id", &self.id)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .finish()
    }
}

impl TokenResponse {
    /// Convert to SalesforceCredentials.
    pub fn to_credentials(&self, api_version: &str) -> SalesforceCredentials {
        let mut creds =
            SalesforceCredentials::new(&self.instance_url, &self.access_token, api_version);

        if let Some(ref rt) = self.refresh_token {
            creds = creds.with_refresh_token(rt);
        }

        creds
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_body() -> serde_json::Value {
        json!({
            "access_token": "mock_access_token",
            "instance_url": "https://mock.my.salesforce.com",
            "token_type": "Bearer",
            "issued_at": "1234567890",
            "id": "https://login.salesforce.com/id/00Dxx0000000001/005xx0000000001",
            "signature": "sig"
        })
    }

    #[tokio::test]
    async fn test_password_flow() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("username=mock_user"))
            .and(body_string_contains("password=p%40ss+word"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let flow = PasswordFlow::new(
            "mock_client_id",
            "mock_client_secret",
            "mock_user",
            "p@ss word",
            format!("{}/services/oauth2/token", mock_server.uri()),
        );
        let token = flow.authenticate().await.unwrap();

        assert_eq!(token.access_token, "mock_access_token");
        assert_eq!(token.instance_url, "https://mock.my.salesforce.com");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert!(token.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_client_credentials_flow() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=cid"))
            .and(body_string_contains("client_secret=csecret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let flow = ClientCredentialsFlow::new("cid", "csecret", mock_server.uri());
        let token = flow.authenticate().await.unwrap();

        assert_eq!(token.issued_at.as_deref(), Some("1234567890"));
    }

    #[tokio::test]
    async fn test_oauth_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .mount(&mock_server)
            .await;

        let flow = PasswordFlow::new("id", "secret", "user", "wrong", mock_server.uri());
        let err = flow.authenticate().await.unwrap_err();

        match err.kind {
            ErrorKind::OAuth { error, description } => {
                assert_eq!(error, "invalid_grant");
                assert_eq!(description, "authentication failure");
            }
            other => panic!("expected OAuth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_oauth_failure_is_unexpected_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let flow = ClientCredentialsFlow::new("id", "secret", mock_server.uri());
        let err = flow.authenticate().await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        match err.kind {
            ErrorKind::Client(inner) => assert!(matches!(
                inner.kind,
                sfkit_client::ErrorKind::UnexpectedStatus { status: 503, ref body } if body == "Service Unavailable"
            )),
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-123"))
            .and(body_string_contains("client_secret=shh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = OAuthClient::new(OAuthConfig::new("cid").with_secret("shh"));
        let token = client
            .refresh_token("rt-123", &format!("{}/", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(token.access_token, "mock_access_token");
    }

    #[test]
    fn test_token_response_to_credentials() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "access123",
            "refresh_token": "refresh456",
            "instance_url": "https://na1.salesforce.com",
            "token_type": "Bearer"
        }))
        .unwrap();

        let creds = token.to_credentials("58.0");
        assert_eq!(creds.instance_url(), "https://na1.salesforce.com");
        assert_eq!(creds.access_token(), "access123");
        assert_eq!(creds.api_version(), "58.0");
        assert_eq!(creds.refresh_token(), Some("refresh456"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "super_secret_access_token",
            "refresh_token": "super_secret_refresh_token",
            "instance_url": "https://na1.salesforce.com",
            "signature": "signature_value"
        }))
        .unwrap();
        let debug_output = format!("{:?}", token);
        assert!(!debug_output.contains("super_secret_access_token"));
        assert!(!debug_output.contains("super_secret_refresh_token"));
        assert!(!debug_output.contains("signature_value"));

        let flow = PasswordFlow::new("id", "client_secret_value", "user", "hunter2", "https://x");
        let debug_output = format!("{:?}", flow);
        assert!(!debug_output.contains("client_secret_value"));
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("user"));

        let config = OAuthConfig::new("key").with_secret("consumer_secret_value");
        assert!(!format!("{:?}", config).contains("consumer_secret_value"));
    }
}
