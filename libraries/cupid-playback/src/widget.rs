//! Embedded player widget abstraction
//!
//! The widget owns actual playback and is the source of truth for its state.
//! It reports readiness, state changes and errors as [`WidgetEvent`]s which the
//! host feeds back into the controller.

use crate::types::{PlaybackState, VideoData};
use cupid_core::TrackId;
use std::time::Duration;

/// Commands and queries understood by the embedded video player
///
/// Commands are fire-and-forget: the controller never assumes one took effect
/// until the widget reports it.
pub trait PlayerWidget: Send {
    /// Load and start a single track
    fn load_by_id(&mut self, id: &TrackId);

    /// Hand a list of tracks to the widget's own queue and start the first
    fn load_playlist(&mut self, ids: &[TrackId]);

    /// Resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Seek within the loaded track
    fn seek_to(&mut self, position: Duration);

    /// Current playback position
    fn current_time(&self) -> Duration;

    /// Duration of the loaded track, `None` until known
    fn duration(&self) -> Option<Duration>;

    /// Metadata of the loaded video, `None` until the widget has it
    fn video_data(&self) -> Option<VideoData>;

    /// Authoritative playback state
    ///
    /// Widgets that cannot report state return `None` and the controller falls
    /// back to its mirrored state.
    fn state(&self) -> Option<PlaybackState> {
        None
    }

    /// Advance the widget's own queue cursor
    fn next_video(&mut self);

    /// Step back in the widget's own queue
    fn previous_video(&mut self);

    /// Set volume (0-100)
    fn set_volume(&mut self, volume: u8);
}

/// Widget error codes for videos that cannot be embedded
pub const UNPLAYABLE_ERROR_CODES: [u16; 3] = [100, 101, 150];

/// Notifications emitted by the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Widget finished initializing and accepts commands
    Ready,

    /// Playback state changed
    StateChanged(PlaybackState),

    /// Widget reported an error code
    Error(u16),
}

impl WidgetEvent {
    /// Whether an error code means "this video can never play here"
    pub fn is_unplayable(code: u16) -> bool {
        UNPLAYABLE_ERROR_CODES.contains(&code)
    }
}
