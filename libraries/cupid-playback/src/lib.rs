//! Cupid - Playback Management
//!
//! Drives the embedded video player behind the Cupid music widget.
//!
//! This crate provides:
//! - A playlist with wrapping navigation (default romantic playlist, random start)
//! - Shuffle (never repeats the current track) and repeat-one
//! - Search-and-play through a [`cupid_core::TrackSearch`] collaborator
//! - A metadata cache with local track matching for voice search
//! - A tokio service that serializes every state change through one channel
//!
//! # Architecture
//!
//! The player widget itself is abstracted by [`PlayerWidget`]. The widget is
//! the source of truth for playback state: [`PlaybackController`] sends it
//! commands and mirrors what it reports through [`WidgetEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use cupid_playback::{PlaybackConfig, PlaybackController, PlayerWidget, VideoData, WidgetEvent};
//! use cupid_core::TrackId;
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct NullWidget;
//!
//! impl PlayerWidget for NullWidget {
//!     fn load_by_id(&mut self, _id: &TrackId) {}
//!     fn load_playlist(&mut self, _ids: &[TrackId]) {}
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek_to(&mut self, _position: Duration) {}
//!     fn current_time(&self) -> Duration { Duration::ZERO }
//!     fn duration(&self) -> Option<Duration> { None }
//!     fn video_data(&self) -> Option<VideoData> { None }
//!     fn next_video(&mut self) {}
//!     fn previous_video(&mut self) {}
//!     fn set_volume(&mut self, _volume: u8) {}
//! }
//!
//! let config = PlaybackConfig {
//!     random_start: false,
//!     ..PlaybackConfig::default()
//! };
//! let mut controller = PlaybackController::new(NullWidget, config);
//!
//! controller.on_widget_event(WidgetEvent::Ready);
//! controller.next();
//! assert_eq!(controller.current_index(), Some(1));
//!
//! controller.toggle_shuffle();
//! assert!(controller.is_shuffle());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod events;
pub mod history;
pub mod metadata;
pub mod playlist;
pub mod service;
pub mod shuffle;
pub mod types;
pub mod widget;

pub use controller::{Deferred, PlaybackController, SearchOutcome};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use metadata::MetadataCache;
pub use playlist::Playlist;
pub use service::{PlaybackCommand, PlaybackHandle, PlaybackService, PlaybackSnapshot};
pub use types::{PlaybackConfig, PlaybackState, PlayerMode, Progress, VideoData, DEFAULT_PLAYLIST};
pub use widget::{PlayerWidget, WidgetEvent};
