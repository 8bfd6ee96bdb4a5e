//! # sfkit-tooling
//!
//! Salesforce Tooling API client: SOQL over tooling objects and custom field
//! creation.
//!
//! Query and create results reuse the REST types from `sfkit-rest`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_tooling::{CustomField, ToolingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfkit_client::Error> {
//!     let client = ToolingClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token_here",
//!     )?;
//!
//!     let classes = client
//!         .query::<serde_json::Value>("SELECT Id, Name FROM ApexClass LIMIT 10")
//!         .await?;
//!     println!("{} classes", classes.total_size);
//!
//!     let field = CustomField::new("Account.Region__c", "Region", "Text").with_length(80);
//!     let created = client.create_custom_field(&field).await?;
//!     println!("Created field {}", created.id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod types;

pub use client::ToolingClient;
pub use types::{CustomField, CustomFieldMetadata};

pub use sfkit_rest::{CreateResult, QueryResult};
