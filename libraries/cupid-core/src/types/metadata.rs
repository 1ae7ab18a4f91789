/// Track display metadata
use serde::{Deserialize, Serialize};

/// Title and author of a track, as reported by the video provider
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Video title
    pub title: String,

    /// Channel / author name (may be empty)
    #[serde(default)]
    pub author: String,
}

impl TrackMetadata {
    /// Create metadata from title and author
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Metadata is only useful for display when it carries a title
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
