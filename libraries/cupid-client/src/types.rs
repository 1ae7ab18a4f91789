//! Types for Cupid backend requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a Cupid backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Request timeout in seconds; generation calls can take a while
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a config for the given backend URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 60,
        }
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// `{ result }` or `{ error }` body returned by every JSON endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

/// Music search request body.
#[derive(Debug, Serialize)]
pub(crate) struct MusicSearchRequest<'a> {
    pub query: &'a str,
}

/// Body returned by the photo upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// oEmbed document for a video.
#[derive(Debug, Deserialize)]
pub(crate) struct OEmbedResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: String,
}
