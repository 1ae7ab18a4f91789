//! Core types for playback management

use cupid_core::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default romantic playlist
pub const DEFAULT_PLAYLIST: [&str; 20] = [
    "h1Fxjmg_KL4",
    "GX9x62kFsVU",
    "WglSfZJOPds",
    "wpka0Q8hlXc",
    "fG8nF53ceQc",
    "1SvBXEqgu6k",
    "dQAuza7q1Wo",
    "dawrQnvwMTY",
    "_hYsJ8I5kjw",
    "o_1aF54DO60",
    "V1Pl8CzNzCw",
    "x9EoXWJ_cWM",
    "nyuo9-OjNNg",
    "N4CmiBP0-_E",
    "5idNBcKDtvA",
    "_w14bUcxl1c",
    "BV0-rrdPJKw",
    "OV2jrgYSQcA",
    "1_WaSnOnu1Q",
    "9UDkYz64ehA",
];

/// Playback state as reported by the player widget
///
/// The widget is authoritative; the controller only mirrors these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing loaded yet
    Unstarted,

    /// Loaded/cued but not playing
    ReadyIdle,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Loading data before playing
    Buffering,

    /// Reached the end of the track
    Ended,
}

impl PlaybackState {
    /// States in which a toggle should pause rather than play
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Buffering)
    }
}

/// Which index space `next`/`previous` operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Local playlist index
    Playlist,

    /// Widget's own queue cursor (search results loaded into the widget)
    Search,
}

/// Title/author plus the id the widget reports for the loaded video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoData {
    /// Id of the video currently loaded in the widget
    pub track_id: TrackId,

    /// Video title
    pub title: String,

    /// Channel name
    pub author: String,
}

/// Playback position snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Current position
    pub position: Duration,

    /// Track duration
    pub duration: Duration,
}

impl Progress {
    /// Position as a percentage of duration (0-100)
    pub fn percent(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32() * 100.0).clamp(0.0, 100.0)
    }
}

/// Format seconds as `m:ss` for display
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial playlist (default: the built-in romantic playlist)
    pub playlist: Vec<TrackId>,

    /// Volume applied when the widget becomes ready (0-100, default: 50)
    pub start_volume: u8,

    /// Start at a random playlist position (default: true)
    pub random_start: bool,

    /// Start playing as soon as the widget is ready (default: true)
    pub autoplay: bool,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat-one flag (default: false)
    pub repeat: bool,

    /// Delay before reading metadata back from the widget (default: 1500ms)
    pub metadata_delay: Duration,

    /// Delay before skipping a track the widget failed to play (default: 2s)
    pub error_skip_delay: Duration,

    /// Shuffle history kept for "previous" (default: 50)
    pub history_size: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            playlist: DEFAULT_PLAYLIST.iter().map(|id| TrackId::new(*id)).collect(),
            start_volume: 50,
            random_start: true,
            autoplay: true,
            shuffle: false,
            repeat: false,
            metadata_delay: Duration::from_millis(1500),
            error_skip_delay: Duration::from_secs(2),
            history_size: 50,
        }
    }
}
