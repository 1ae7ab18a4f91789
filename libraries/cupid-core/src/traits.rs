/// Collaborator traits
///
/// The playback controller never talks to the network itself. Searching for a
/// song and looking up display metadata both go through these seams so the
/// brittle scraping logic can be swapped without touching playback.
use crate::error::Result;
use crate::types::{TrackId, TrackMetadata};
use async_trait::async_trait;

/// Free-text song search
///
/// Implementations resolve a query to the first playable track identifier.
/// "Nothing found" is `Ok(None)`, not an error.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Search for a track matching `query`
    ///
    /// # Errors
    /// Returns an error only when the search could not be performed at all.
    async fn search(&self, query: &str) -> Result<Option<TrackId>>;
}

/// Display metadata lookup for a track identifier
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Look up title/author for `id`
    ///
    /// Returns `Ok(None)` when the provider has no metadata for the track.
    async fn lookup(&self, id: &TrackId) -> Result<Option<TrackMetadata>>;
}
