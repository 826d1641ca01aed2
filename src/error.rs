//! Compute Engine error type
//!
//! Every operation of the RPC layer fails with the same error kind,
//! [`ComputeError`], which wraps whatever caused the call to fail: a
//! transport error, an API error response or an undecodable body.

use serde::Deserialize;
use std::error::Error as StdError;

/// Boxed underlying cause of a [`ComputeError`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// HTTP status codes worth retrying by a caller
const RETRYABLE_CODES: &[u16] = &[500, 502, 503, 504];

/// API error reasons worth retrying by a caller
const RETRYABLE_REASONS: &[&str] = &["rateLimitExceeded", "backendError", "internalError"];

/// Failure of a Compute Engine call
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ComputeError {
    code: Option<u16>,
    reason: Option<String>,
    message: String,
    retryable: bool,
    #[source]
    source: Option<BoxError>,
}

/// Error envelope returned by Google APIs:
/// `{"error": {"code": 404, "message": "...", "errors": [{"reason": "notFound"}]}}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    reason: Option<String>,
}

impl ComputeError {
    /// Create an error with a plain message and no cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            reason: None,
            message: message.into(),
            retryable: false,
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(message)
        }
    }

    /// Build an error from a non-success API response.
    ///
    /// The body is parsed as a Google API error envelope when possible; any
    /// other body falls back to a generic message carrying the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();

        let reason = parsed
            .as_ref()
            .and_then(|b| b.error.errors.iter().find_map(|e| e.reason.clone()));
        let message = parsed
            .and_then(|b| b.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("API request failed: {}", status));

        let retryable = RETRYABLE_CODES.contains(&status)
            || reason
                .as_deref()
                .is_some_and(|r| RETRYABLE_REASONS.contains(&r));

        Self {
            code: Some(status),
            reason,
            message,
            retryable,
            source: None,
        }
    }

    /// HTTP status of the failed call, if the server answered
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// First reason reported in the API error body
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Only a classification: nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Some(404)
    }

    /// Short message suitable for display to an end user.
    /// Security: avoids echoing raw API error details.
    pub fn user_message(&self) -> String {
        match self.code {
            Some(401) => {
                "Authentication failed. Run 'gcloud auth application-default login'.".to_string()
            },
            Some(403) => "Permission denied. Check your GCP IAM permissions.".to_string(),
            Some(404) => "Resource not found.".to_string(),
            Some(409) => "Resource conflict.".to_string(),
            Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
            Some(400) => "Invalid request. Check your parameters.".to_string(),
            Some(500..=599) => "GCP service temporarily unavailable. Please try again.".to_string(),
            Some(_) => "Request failed. Check your network connection and try again.".to_string(),
            None => {
                let sanitized: String = self
                    .message
                    .chars()
                    .filter(|c| c.is_ascii_graphic() || *c == ' ')
                    .take(80)
                    .collect();
                if sanitized.len() < self.message.len() {
                    format!("{}...", sanitized)
                } else {
                    sanitized
                }
            },
        }
    }
}

impl From<reqwest::Error> for ComputeError {
    fn from(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect();
        let code = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Failed to connect".to_string()
        } else {
            "Failed to send request".to_string()
        };

        Self {
            code,
            retryable,
            ..Self::with_source(message, err)
        }
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source("Failed to parse response JSON", err)
    }
}
