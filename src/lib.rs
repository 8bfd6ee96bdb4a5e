//! # sfkit
//!
//! A Salesforce API client library for Rust, built around the lifecycle of
//! long-running remote operations.
//!
//! ## Security
//!
//! - Tokens and secrets are redacted in Debug output
//! - Tracing skips credential parameters
//! - Calls without an access token or instance URL fail before any request
//!
//! ## Crates
//!
//! - **sfkit-client** - Transport, response decoding, errors and the operation lifecycle types
//! - **sfkit-auth** - Credentials and OAuth 2.0 token grants
//! - **sfkit-bulk** - Bulk API 2.0 query jobs
//! - **sfkit-metadata** - Metadata API deploy and retrieve
//! - **sfkit-rest** - REST API: CRUD, describe, composite, query, limits
//! - **sfkit-tooling** - Tooling API: query and custom fields
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use sfkit::{BulkApiClient, Credentials, PollPolicy, SalesforceCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SalesforceCredentials::from_env()?.to_client()?;
//!     let bulk = BulkApiClient::from_client(client);
//!
//!     let handle = bulk.submit_query("SELECT Id, Name FROM Account").await?;
//!     let policy = PollPolicy::new(Duration::from_secs(2));
//!     bulk.wait_for_query_job(&handle.id, &policy).await?.into_outcome()?;
//!
//!     for row in bulk.get_all_results_parsed(&handle.id, 10_000).await? {
//!         println!("{}", row["Name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use sfkit_auth as auth;
#[cfg(feature = "bulk")]
pub use sfkit_bulk as bulk;
#[cfg(feature = "client")]
pub use sfkit_client as client;
#[cfg(feature = "metadata")]
pub use sfkit_metadata as metadata;
#[cfg(feature = "rest")]
pub use sfkit_rest as rest;
#[cfg(feature = "tooling")]
pub use sfkit_tooling as tooling;

#[cfg(feature = "auth")]
pub use sfkit_auth::{Credentials, SalesforceCredentials};
#[cfg(feature = "bulk")]
pub use sfkit_bulk::BulkApiClient;
#[cfg(feature = "client")]
pub use sfkit_client::{
    ClientConfig, Error, ErrorKind, OperationHandle, OperationKind, OperationState,
    OperationStatus, PollPolicy, Result, SalesforceClient,
};
#[cfg(feature = "metadata")]
pub use sfkit_metadata::MetadataClient;
#[cfg(feature = "rest")]
pub use sfkit_rest::SalesforceRestClient;
#[cfg(feature = "tooling")]
pub use sfkit_tooling::ToolingClient;
