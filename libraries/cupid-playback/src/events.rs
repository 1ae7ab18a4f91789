//! Playback events
//!
//! Emitted by the controller for UI synchronization. The controller queues
//! them; hosts drain the queue after each operation.

use crate::types::{PlaybackState, PlayerMode};
use cupid_core::{TrackId, TrackMetadata};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Widget reported a new playback state
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A different track was loaded
    TrackChanged {
        /// New current track
        track_id: TrackId,
        /// Playlist index, `None` for widget-queue playback
        index: Option<usize>,
        /// Index space now in use
        mode: PlayerMode,
    },

    /// Metadata for the playing track became available
    MetadataUpdated {
        /// Track the metadata belongs to
        track_id: TrackId,
        /// Title and author
        metadata: TrackMetadata,
    },

    /// Shuffle or repeat changed
    ModifiersChanged {
        /// Shuffle flag
        shuffle: bool,
        /// Repeat-one flag
        repeat: bool,
    },

    /// Player panel opened or closed
    PlayerVisibility {
        /// Whether the panel is open
        open: bool,
    },

    /// A search found a track and it is being played
    SearchStarted {
        /// Query that was searched
        query: String,
        /// Track that was found
        track_id: TrackId,
    },

    /// A search produced no result; playback untouched
    SearchNotFound {
        /// Query that was searched
        query: String,
    },

    /// A search failed; playback untouched
    SearchFailed {
        /// Query that was searched
        query: String,
        /// Failure description
        message: String,
    },

    /// Non-fatal problem worth showing (widget not ready, playback error)
    Warning {
        /// Human readable message
        message: String,
    },
}
