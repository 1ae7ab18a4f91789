//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Player widget has not signalled readiness yet
    #[error("Player widget not ready")]
    WidgetNotReady,

    /// Playlist is empty
    #[error("Playlist is empty")]
    PlaylistEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Playback service has shut down
    #[error("Playback service stopped")]
    ServiceStopped,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
