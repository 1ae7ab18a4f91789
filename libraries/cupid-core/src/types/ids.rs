/// ID types for Cupid entities
use crate::error::{CupidError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a video provider identifier
const TRACK_ID_LEN: usize = 11;

/// Track identifier
///
/// An opaque handle understood by the embedded video player. The player
/// accepts anything, so `new` is unchecked; `parse` enforces the canonical
/// 11-character form and is used where ids come from untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID without validation
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a canonical video identifier (`[A-Za-z0-9_-]{11}`)
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.len() == TRACK_ID_LEN && id.chars().all(Self::is_id_char) {
            Ok(Self(id.to_string()))
        } else {
            Err(CupidError::invalid_input(format!(
                "not a video identifier: {id:?}"
            )))
        }
    }

    /// Whether `c` may appear in a video identifier
    pub fn is_id_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Watch URL for this track on the video provider
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
