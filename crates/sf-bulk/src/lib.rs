//! # sfkit-bulk
//!
//! Salesforce Bulk API 2.0 query jobs as long-running operations.
//!
//! ## Features
//!
//! - **Submit** - Create a query job from SOQL, get back an `OperationHandle`
//! - **Poll** - One status call per poll, mapped onto `OperationStatus`
//! - **Fetch** - CSV result pages, raw or parsed, paginated by locator
//! - **Abort / Delete** - Stop a running job or remove a finished one
//!
//! Errors are `sfkit_client::Error`, shared with every other surface.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_bulk::BulkApiClient;
//! use sfkit_client::PollPolicy;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfkit_client::Error> {
//!     let client = BulkApiClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token",
//!     )?;
//!
//!     let handle = client.submit_query("SELECT Id, Name FROM Account").await?;
//!     let status = client
//!         .wait_for_query_job(&handle.id, &PollPolicy::default())
//!         .await?
//!         .into_outcome()?;
//!
//!     let rows = client.get_all_results_parsed(&status.id, 50_000).await?;
//!     println!("Retrieved {} records", rows.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod types;

pub use client::BulkApiClient;
pub use types::*;
