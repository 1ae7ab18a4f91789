//! Playlist with a wrapping cursor
//!
//! Invariant: whenever the playlist is non-empty, `index < len`.

use crate::error::{PlaybackError, Result};
use cupid_core::TrackId;

/// Ordered track list plus the position of the current track
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<TrackId>,
    index: usize,
}

impl Playlist {
    /// Create a playlist positioned at the first track
    pub fn new(tracks: Vec<TrackId>) -> Self {
        Self { tracks, index: 0 }
    }

    /// Create a playlist positioned at `index`, clamped into range
    pub fn with_start(tracks: Vec<TrackId>, index: usize) -> Self {
        let index = if tracks.is_empty() {
            0
        } else {
            index.min(tracks.len() - 1)
        };
        Self { tracks, index }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[TrackId] {
        &self.tracks
    }

    /// Current index, `None` when empty
    pub fn index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.index)
        }
    }

    /// Current track
    pub fn current(&self) -> Option<&TrackId> {
        self.tracks.get(self.index)
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackId> {
        self.tracks.get(index)
    }

    /// Move to the next track, wrapping to the start
    pub fn advance(&mut self) -> Option<&TrackId> {
        if self.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.current()
    }

    /// Move to the previous track, wrapping to the end
    pub fn retreat(&mut self) -> Option<&TrackId> {
        if self.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    /// Jump to `index`
    pub fn select(&mut self, index: usize) -> Result<&TrackId> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.index = index;
        Ok(&self.tracks[index])
    }

    /// Insert a track right after the current one without moving the cursor
    ///
    /// Returns the index of the inserted track.
    pub fn insert_after_current(&mut self, track: TrackId) -> usize {
        if self.tracks.is_empty() {
            self.tracks.push(track);
            self.index = 0;
            return 0;
        }
        let position = self.index + 1;
        self.tracks.insert(position, track);
        position
    }

    /// First position of `track`
    pub fn position_of(&self, track: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t == track)
    }
}
