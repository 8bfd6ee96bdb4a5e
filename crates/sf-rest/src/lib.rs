//! # sfkit-rest
//!
//! Salesforce REST API client for record CRUD, describe, composite batches,
//! SOQL query, record counts and org limits.
//!
//! Every call goes through `SalesforceClient`, so a missing token or
//! instance URL fails before anything is sent, and errors are the shared
//! `sfkit_client::Error`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_rest::SalesforceRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfkit_client::Error> {
//!     let client = SalesforceRestClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token_here",
//!     )?;
//!
//!     let accounts: Vec<serde_json::Value> = client
//!         .query_all("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!
//!     let created = client
//!         .create("Account", &serde_json::json!({"Name": "New Account"}))
//!         .await?;
//!     client
//!         .update("Account", &created.id, &serde_json::json!({"Name": "Updated"}))
//!         .await?;
//!     client.delete("Account", &created.id).await?;
//!
//!     let counts = client.record_counts(&["Account", "Contact"]).await?;
//!     println!("{} accounts", counts.get("Account").unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod composite;
mod describe;
mod limits;
mod query;
mod sobject;

pub use client::SalesforceRestClient;
pub use composite::{
    CollectionRequest, CompositeRequest, CompositeResponse, CompositeResult, CompositeSubrequest,
    CompositeSubresponse,
};
pub use describe::{
    ChildRelationship, DescribeSObjectResult, FieldDescribe, PicklistValue, RecordTypeInfo,
};
pub use limits::{LimitInfo, Limits, RecordCount, RecordCounts};
pub use query::QueryResult;
pub use sobject::{CreateResult, SalesforceError};
