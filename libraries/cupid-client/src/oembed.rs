//! Track metadata through the video provider's oEmbed endpoint.

use crate::error::Result;
use crate::types::OEmbedResponse;
use async_trait::async_trait;
use cupid_core::{CupidError, MetadataLookup, TrackId, TrackMetadata};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Public oEmbed endpoint of the video provider
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// [`MetadataLookup`] backed by oEmbed
///
/// Needs no API key. Private or removed videos answer with a non-2xx status
/// and are reported as "no metadata".
#[derive(Clone)]
pub struct OEmbedLookup {
    http: Client,
    endpoint: String,
}

impl OEmbedLookup {
    /// Lookup against the public endpoint.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_OEMBED_ENDPOINT)
    }

    /// Lookup against a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MetadataLookup for OEmbedLookup {
    async fn lookup(&self, id: &TrackId) -> cupid_core::Result<Option<TrackMetadata>> {
        let watch_url = id.watch_url();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| CupidError::network(e.to_string()))?;

        if !response.status().is_success() {
            debug!(track = %id, status = response.status().as_u16(), "No oEmbed metadata");
            return Ok(None);
        }

        let body: OEmbedResponse = response
            .json()
            .await
            .map_err(|e| CupidError::UnexpectedResponse(e.to_string()))?;

        let metadata = TrackMetadata::new(body.title, body.author_name);
        Ok(metadata.has_title().then_some(metadata))
    }
}
