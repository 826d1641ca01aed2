//! GCP API interaction module
//!
//! Transport plumbing used by the RPC layer: authentication, the HTTP
//! wrapper and Compute Engine URL construction.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication and gcloud project/zone discovery
//! - [`client`] - GCP client combining credentials, HTTP and URL helpers
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use gcompute::gcp::client::GcpClient;
//!
//! async fn example() -> Result<(), gcompute::ComputeError> {
//!     let client = GcpClient::new("my-project").await?;
//!     let zones = client.get(&client.compute_url("zones"), &[]).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
