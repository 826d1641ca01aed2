//! GCP Client
//!
//! Combines credentials and the HTTP wrapper, and knows how Compute Engine
//! URLs are laid out.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use crate::error::ComputeError;
use serde_json::Value;
use std::time::Duration;

/// Public Compute Engine v1 endpoint
pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1";

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    endpoint: String,
}

impl GcpClient {
    /// Create a client using Application Default Credentials
    pub async fn new(project_id: &str) -> Result<Self, ComputeError> {
        let credentials = GcpCredentials::new().await?;
        Self::with_credentials(project_id, credentials)
    }

    /// Create a client from already-built credentials
    pub fn with_credentials(
        project_id: &str,
        credentials: GcpCredentials,
    ) -> Result<Self, ComputeError> {
        Ok(Self {
            credentials,
            http: GcpHttpClient::new()?,
            project_id: project_id.to_string(),
            endpoint: DEFAULT_COMPUTE_ENDPOINT.to_string(),
        })
    }

    /// Replace the transport with one using `timeout` per request
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ComputeError> {
        self.http = GcpHttpClient::with_timeout(timeout)?;
        Ok(self)
    }

    /// Point the client at another Compute Engine endpoint (emulator, proxy, mock)
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ComputeError> {
        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ComputeError::with_source(format!("Invalid endpoint: {}", endpoint), e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ComputeError::new(format!(
                "Unsupported endpoint scheme: {}",
                parsed.scheme()
            )));
        }

        self.endpoint = endpoint.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String, ComputeError> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ComputeError> {
        let token = self.get_token().await?;
        self.http.get(url, &token, query).await
    }

    // =========================================================================
    // Compute Engine URL helpers
    // =========================================================================

    /// Build a URL under `projects/{project}` for an explicit project
    pub fn compute_project_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.endpoint,
            urlencoding::encode(project),
            path
        )
    }

    /// Build a URL under the client's own project
    pub fn compute_url(&self, path: &str) -> String {
        self.compute_project_url(&self.project_id, path)
    }

    /// Build zonal Compute Engine API URL
    pub fn compute_zonal_url(&self, zone: &str, resource: &str) -> String {
        self.compute_url(&format!("zones/{}/{}", urlencoding::encode(zone), resource))
    }

    /// Build global Compute Engine API URL
    pub fn compute_global_url(&self, project: &str, resource: &str) -> String {
        self.compute_project_url(project, &format!("global/{}", resource))
    }

    /// Build aggregated Compute Engine API URL (all zones)
    pub fn compute_aggregated_url(&self, resource: &str) -> String {
        self.compute_url(&format!("aggregated/{}", resource))
    }
}

/// Extract the last path segment of a resource URL
/// e.g., "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a" -> "us-central1-a"
pub fn short_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
