//! # sfkit-metadata
//!
//! Salesforce Metadata API (SOAP) deploy and retrieve as long-running
//! operations.
//!
//! ## Features
//!
//! - **Deploy** - Submit a zip with `DeployOptions`, poll with full component
//!   and Apex test detail, cancel
//! - **Retrieve** - Submit a `package.xml` manifest, poll until the archive
//!   is ready
//! - **Manifests** - Build `package.xml` with escaping, or pass your own
//!
//! A retrieve's result arrives whole in the final poll; there is no paging.
//! Metadata operations cannot be deleted, only deploys can be cancelled.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_metadata::{DeployOptions, MetadataClient, PackageManifest, RetrieveRequest};
//! use sfkit_client::PollPolicy;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetadataClient::new("https://myorg.my.salesforce.com", "access_token")?;
//!
//!     let zip_bytes = std::fs::read("package.zip")?;
//!     let handle = client.deploy_zip(&zip_bytes, &DeployOptions::check_only()).await?;
//!     let status = client.wait_for_deploy(&handle.id, &PollPolicy::default()).await?;
//!     println!("Deploy {}: success={}", status.remote_state, status.success);
//!
//!     let manifest = PackageManifest::new("58.0").add_type("ApexClass", ["*"]);
//!     let handle = client.retrieve(&RetrieveRequest::from_manifest(&manifest)).await?;
//!     let status = client.wait_for_retrieve(&handle.id, &PollPolicy::default()).await?;
//!     if let Some(outcome) = status.detail {
//!         std::fs::write("retrieved.zip", outcome.zip_bytes()?)?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod deploy;
mod retrieve;
mod types;

pub use client::MetadataClient;
pub use deploy::{
    CodeCoverageResult, CodeLocation, ComponentFailure, ComponentSuccess, DeployDetails,
    DeployOptions, DeployOutcome, DeployStatus, RunTestResult, TestFailure, TestSuccess,
};
pub use retrieve::{
    normalize_manifest, PackageManifest, PackageTypeMembers, RetrieveOutcome, RetrieveRequest,
    RetrieveStatus,
};
pub use types::{FileProperties, RetrieveMessage, TestLevel};
