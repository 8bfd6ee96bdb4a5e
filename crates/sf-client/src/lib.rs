//! # sfkit-client
//!
//! Core infrastructure shared by every Salesforce API surface in sfkit.
//!
//! This crate provides:
//! - A [`Transport`] seam with a reqwest-backed [`HttpTransport`]
//! - Connection pooling, compression and timeouts via [`ClientConfig`]
//! - Response decoding for JSON, CSV and SOAP bodies
//! - One error taxonomy for every data-plane crate
//! - The long-running operation types in [`lro`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-rest, sf-bulk, sf-metadata, sf-tooling)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds credentials + shared transport                     │
//! │  - Refuses to send without credentials                      │
//! │  - Typed JSON methods (get_json, post_json, etc.)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Arc<dyn Transport>                          │
//! │  - HttpTransport: one pooled reqwest client, no retries     │
//! │  - Any test double implementing Transport                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses come back buffered whatever their status; the [`decode`]
//! module turns them into typed values or classified errors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfkit_client::SalesforceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfkit_client::Error> {
//!     let client = SalesforceClient::new("https://na1.salesforce.com", token)?;
//!
//!     let limits: serde_json::Value = client.rest_get("limits").await?;
//!     println!("{limits:#}");
//!
//!     Ok(())
//! }
//! ```

mod config;
pub mod decode;
mod error;
pub mod lro;
mod request;
mod response;
mod salesforce_client;
mod transport;
pub mod xml;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use decode::{parse_csv, Payload, ResponseFormat, Row};
pub use error::{ApiError, DecodeFailure, Error, ErrorKind, Result, SoapFaultClass};
pub use lro::driver::{collect_pages, poll_until_terminal, PollPolicy};
pub use lro::{
    normalize_locator, OperationHandle, OperationKind, OperationState, OperationStatus, Progress,
    RemoteError, ResultPage,
};
pub use request::{HttpRequest, RequestBody, RequestMethod};
pub use response::Response;
pub use salesforce_client::SalesforceClient;
pub use transport::{HttpTransport, Transport};
pub use xml::XmlElement;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "58.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfkit/", env!("CARGO_PKG_VERSION"));
