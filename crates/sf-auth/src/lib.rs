//! # sfkit-auth
//!
//! Salesforce credentials and OAuth 2.0 token grants.
//!
//! ## Security
//!
//! - Tokens and secrets are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Supported Authentication Methods
//!
//! - **Environment** - [`SalesforceCredentials::from_env`]
//! - **OAuth 2.0 Username-Password** - [`PasswordFlow`]
//! - **OAuth 2.0 Client Credentials** - [`ClientCredentialsFlow`]
//! - **OAuth 2.0 Refresh Token** - [`OAuthClient::refresh_token`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_auth::{ClientCredentialsFlow, Credentials, SalesforceCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfkit_auth::Error> {
//!     // From environment variables
//!     let creds = SalesforceCredentials::from_env()?;
//!
//!     // Client credentials grant
//!     let flow = ClientCredentialsFlow::new(
//!         "consumer_key",
//!         "consumer_secret",
//!         "https://myorg.my.salesforce.com/services/oauth2/token",
//!     );
//!     let creds = flow.authenticate().await?.to_credentials("58.0");
//!
//!     let client = creds.to_client()?;
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
pub use oauth::{ClientCredentialsFlow, OAuthClient, OAuthConfig, PasswordFlow, TokenResponse};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
