//! Playback controller
//!
//! Owns the playlist, shuffle/repeat modifiers and metadata cache, and drives
//! a [`PlayerWidget`]. The widget is authoritative for playback state: the
//! controller issues commands and mirrors whatever the widget reports back
//! through [`PlaybackController::on_widget_event`].
//!
//! Work that has to happen later (reading metadata once the widget has it,
//! skipping a broken track after a pause) is queued as [`Deferred`] requests
//! carrying a generation token. Every track change bumps the generation, so a
//! request issued for an older track is discarded when it comes back.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::history::History;
use crate::metadata::MetadataCache;
use crate::playlist::Playlist;
use crate::shuffle::pick_other_index;
use crate::types::{PlaybackConfig, PlaybackState, PlayerMode, Progress};
use crate::widget::{PlayerWidget, WidgetEvent};
use cupid_core::{TrackId, TrackMetadata, TrackSearch};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Work the host must schedule after its configured delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Read metadata back from the widget
    RefreshMetadata {
        /// Track generation the refresh belongs to
        generation: u64,
    },

    /// Skip a track the widget could not play
    SkipAfterError {
        /// Track generation the error belongs to
        generation: u64,
    },
}

impl Deferred {
    /// How long the host waits before running this request
    pub fn delay(&self, config: &PlaybackConfig) -> Duration {
        match self {
            Deferred::RefreshMetadata { .. } => config.metadata_delay,
            Deferred::SkipAfterError { .. } => config.error_skip_delay,
        }
    }
}

/// Result of a search-and-play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Track found, inserted after the current one and loaded
    Playing(TrackId),

    /// Search succeeded but found nothing
    NotFound,

    /// Search collaborator failed
    Failed(String),
}

/// Central playback management
pub struct PlaybackController<W: PlayerWidget> {
    widget: W,
    config: PlaybackConfig,
    playlist: Playlist,
    history: History,
    mode: PlayerMode,
    shuffle: bool,
    repeat: bool,

    /// Set once the widget reports `Ready`
    ready: bool,

    /// Last state reported by the widget
    state: PlaybackState,

    /// Track chosen before the widget was ready, loaded on `Ready`
    pending_load: Option<TrackId>,

    player_open: bool,
    metadata: MetadataCache,

    /// Bumped on every track change
    generation: u64,

    /// Generation whose metadata has been published
    published_generation: Option<u64>,

    deferred: Vec<Deferred>,
    pending_events: Vec<PlaybackEvent>,
    rng: StdRng,
}

impl<W: PlayerWidget> PlaybackController<W> {
    /// Create a controller seeded from system entropy
    pub fn new(widget: W, config: PlaybackConfig) -> Self {
        Self::with_rng(widget, config, StdRng::from_entropy())
    }

    /// Create a controller with an explicit random source
    pub fn with_rng(widget: W, config: PlaybackConfig, mut rng: StdRng) -> Self {
        let tracks = config.playlist.clone();
        let start = if config.random_start && !tracks.is_empty() {
            rng.gen_range(0..tracks.len())
        } else {
            0
        };

        Self {
            widget,
            playlist: Playlist::with_start(tracks, start),
            history: History::new(config.history_size),
            mode: PlayerMode::Playlist,
            shuffle: config.shuffle,
            repeat: config.repeat,
            ready: false,
            state: PlaybackState::Unstarted,
            pending_load: None,
            player_open: false,
            metadata: MetadataCache::new(),
            generation: 0,
            published_generation: None,
            deferred: Vec::new(),
            pending_events: Vec::new(),
            rng,
            config,
        }
    }

    // ===== Track navigation =====

    /// Play an explicit track
    ///
    /// Leaves search mode. If the track is in the playlist the cursor moves
    /// to it so that `next` continues from there.
    pub fn load_track(&mut self, id: TrackId) {
        if let Some(position) = self.playlist.position_of(&id) {
            let _ = self.playlist.select(position);
        }
        self.start_track(id);
    }

    /// Jump to a playlist position and play it
    pub fn select(&mut self, index: usize) -> Result<()> {
        let id = self.playlist.select(index)?.clone();
        self.start_track(id);
        Ok(())
    }

    /// Skip to the next track
    ///
    /// Sequential with wraparound, or a random different index when shuffle
    /// is on. In search mode the widget's own queue advances instead.
    pub fn next(&mut self) {
        if self.mode == PlayerMode::Search {
            self.step_widget_queue(true);
            return;
        }

        let Some(current) = self.playlist.index() else {
            tracing::debug!("next() on empty playlist");
            return;
        };

        if self.shuffle {
            let pick = pick_other_index(&mut self.rng, self.playlist.len(), current);
            self.history.push(current);
            let _ = self.playlist.select(pick);
        } else {
            self.playlist.advance();
        }

        self.start_current();
    }

    /// Go back to the previous track
    ///
    /// With shuffle on this walks back through the shuffle history first;
    /// otherwise it retreats with wraparound.
    pub fn previous(&mut self) {
        if self.mode == PlayerMode::Search {
            self.step_widget_queue(false);
            return;
        }

        if self.playlist.is_empty() {
            tracing::debug!("previous() on empty playlist");
            return;
        }

        let from_history = if self.shuffle {
            self.history
                .pop()
                .filter(|index| *index < self.playlist.len())
        } else {
            None
        };

        match from_history {
            Some(index) => {
                let _ = self.playlist.select(index);
            }
            None => {
                self.playlist.retreat();
            }
        }

        self.start_current();
    }

    /// Hand search results to the widget's queue and enter search mode
    pub fn play_search_results(&mut self, ids: Vec<TrackId>) -> Result<()> {
        let Some(first) = ids.first().cloned() else {
            return Err(PlaybackError::PlaylistEmpty);
        };
        if !self.ready {
            self.warn("Player not ready yet");
            return Err(PlaybackError::WidgetNotReady);
        }

        self.mode = PlayerMode::Search;
        self.widget.load_playlist(&ids);
        self.bump_generation();
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: first,
            index: None,
            mode: PlayerMode::Search,
        });
        Ok(())
    }

    // ===== Search =====

    /// Search for a track and play it right after the current one
    ///
    /// Playback is left untouched when nothing is found or the search fails.
    pub async fn search_and_play(&mut self, search: &dyn TrackSearch, query: &str) -> SearchOutcome {
        let result = search.search(query).await;
        self.apply_search_result(query, result)
    }

    /// Apply the answer of a search collaborator
    pub fn apply_search_result(
        &mut self,
        query: &str,
        result: cupid_core::Result<Option<TrackId>>,
    ) -> SearchOutcome {
        match result {
            Ok(Some(id)) => {
                let position = self.playlist.insert_after_current(id.clone());
                self.history.shift_from(position);
                let _ = self.playlist.select(position);
                tracing::info!("Search '{}' found {}", query, id);
                self.pending_events.push(PlaybackEvent::SearchStarted {
                    query: query.to_string(),
                    track_id: id.clone(),
                });
                self.start_track(id.clone());
                self.set_player_open(true);
                SearchOutcome::Playing(id)
            }
            Ok(None) => {
                tracing::info!("Search '{}' found nothing", query);
                self.pending_events.push(PlaybackEvent::SearchNotFound {
                    query: query.to_string(),
                });
                SearchOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!("Search '{}' failed: {}", query, e);
                let message = e.to_string();
                self.pending_events.push(PlaybackEvent::SearchFailed {
                    query: query.to_string(),
                    message: message.clone(),
                });
                SearchOutcome::Failed(message)
            }
        }
    }

    /// Best local match for a query among cached playlist metadata
    pub fn find_track_by_query(&self, query: &str) -> Option<TrackId> {
        self.metadata
            .find_track_by_query(self.playlist.tracks(), query)
    }

    // ===== Play/pause =====

    /// Resume playback
    pub fn play(&mut self) {
        if self.require_ready() {
            self.widget.play();
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.require_ready() {
            self.widget.pause();
        }
    }

    /// Issue the opposite of the widget's current play/pause state
    pub fn toggle_playback(&mut self) {
        if !self.require_ready() {
            return;
        }
        if self.current_state().is_active() {
            self.widget.pause();
        } else {
            self.widget.play();
        }
    }

    /// Whether the widget is playing
    pub fn is_playing(&self) -> bool {
        self.current_state().is_active()
    }

    /// Widget-reported state, or the mirrored one when the widget cannot say
    pub fn current_state(&self) -> PlaybackState {
        self.widget.state().unwrap_or(self.state)
    }

    // ===== Modifiers =====

    /// Toggle shuffle, returning the new value
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        if !self.shuffle {
            self.history.clear();
        }
        self.emit_modifiers();
        self.shuffle
    }

    /// Toggle repeat-one, returning the new value
    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.emit_modifiers();
        self.repeat
    }

    /// Set widget volume (0-100)
    pub fn set_volume(&mut self, volume: u8) {
        if self.require_ready() {
            self.widget.set_volume(volume.min(100));
        }
    }

    // ===== Position =====

    /// Current position and duration, once the widget knows the duration
    pub fn progress(&self) -> Option<Progress> {
        if !self.ready {
            return None;
        }
        let duration = self.widget.duration().filter(|d| !d.is_zero())?;
        Some(Progress {
            position: self.widget.current_time(),
            duration,
        })
    }

    /// Seek to a percentage (0-100) of the track
    pub fn seek_percent(&mut self, percent: f32) -> Result<()> {
        if !self.ready {
            return Err(PlaybackError::WidgetNotReady);
        }
        let Some(duration) = self.widget.duration().filter(|d| !d.is_zero()) else {
            tracing::debug!("Seek ignored, duration unknown");
            return Ok(());
        };
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        self.widget.seek_to(duration.mul_f32(fraction));
        Ok(())
    }

    // ===== Player panel =====

    /// Open the player panel
    pub fn open_player(&mut self) {
        self.set_player_open(true);
    }

    /// Close the player panel
    pub fn close_player(&mut self) {
        self.set_player_open(false);
    }

    fn set_player_open(&mut self, open: bool) {
        if self.player_open != open {
            self.player_open = open;
            self.pending_events
                .push(PlaybackEvent::PlayerVisibility { open });
        }
    }

    // ===== Widget notifications =====

    /// Handle a notification from the widget
    pub fn on_widget_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => self.on_ready(),
            WidgetEvent::StateChanged(state) => self.on_state_changed(state),
            WidgetEvent::Error(code) => self.on_widget_error(code),
        }
    }

    fn on_ready(&mut self) {
        tracing::info!("Player widget ready");
        self.ready = true;
        self.widget.set_volume(self.config.start_volume);

        let explicit = self.pending_load.take();
        let autoplay = if self.config.autoplay {
            self.playlist.current().cloned()
        } else {
            None
        };

        if let Some(id) = explicit.or(autoplay) {
            self.widget.load_by_id(&id);
            self.deferred.push(Deferred::RefreshMetadata {
                generation: self.generation,
            });
        }
    }

    fn on_state_changed(&mut self, state: PlaybackState) {
        self.state = state;
        self.pending_events
            .push(PlaybackEvent::StateChanged { state });

        match state {
            PlaybackState::Ended => self.on_track_ended(),
            PlaybackState::Playing => {
                // The widget's queue can move on by itself in search mode.
                let stale = self.mode == PlayerMode::Search
                    || self.published_generation != Some(self.generation);
                if stale {
                    self.deferred.push(Deferred::RefreshMetadata {
                        generation: self.generation,
                    });
                }
            }
            _ => {}
        }
    }

    /// End of track: repeat restarts it, anything else advances (obeying shuffle)
    fn on_track_ended(&mut self) {
        if self.repeat {
            self.widget.seek_to(Duration::ZERO);
            self.widget.play();
        } else {
            self.next();
        }
    }

    fn on_widget_error(&mut self, code: u16) {
        if self.mode == PlayerMode::Search && WidgetEvent::is_unplayable(code) {
            tracing::warn!("Search result unplayable (code {}), trying next video", code);
            self.widget.next_video();
            return;
        }

        self.warn(&format!("Playback error {code}, skipping"));
        self.deferred.push(Deferred::SkipAfterError {
            generation: self.generation,
        });
    }

    /// Skip after a widget error, unless the track already changed
    pub fn skip_after_error(&mut self, generation: u64) {
        if generation == self.generation {
            self.next();
        } else {
            tracing::debug!("Dropping stale error skip (generation {})", generation);
        }
    }

    // ===== Metadata =====

    /// Read metadata back from the widget and publish it
    ///
    /// Ignored when `generation` is older than the current track. Returns the
    /// metadata that was published, if any.
    pub fn refresh_metadata(&mut self, generation: u64) -> Option<TrackMetadata> {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale metadata refresh (generation {} != {})",
                generation,
                self.generation
            );
            return None;
        }

        let data = self.widget.video_data()?;
        let metadata = TrackMetadata::new(data.title, data.author);
        if !metadata.has_title() {
            return None;
        }

        self.metadata.insert(data.track_id.clone(), metadata.clone());
        self.published_generation = Some(generation);
        self.pending_events.push(PlaybackEvent::MetadataUpdated {
            track_id: data.track_id,
            metadata: metadata.clone(),
        });
        Some(metadata)
    }

    /// Store metadata fetched elsewhere (prefetch)
    pub fn cache_metadata(&mut self, id: TrackId, metadata: TrackMetadata) {
        self.metadata.insert(id, metadata);
    }

    /// Playlist tracks without a cached title
    pub fn tracks_missing_metadata(&self) -> Vec<TrackId> {
        self.playlist
            .tracks()
            .iter()
            .filter(|id| !self.metadata.has_title(id))
            .cloned()
            .collect()
    }

    // ===== Deferred work and events =====

    /// Take queued deferred requests
    pub fn take_deferred(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.deferred)
    }

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Accessors =====

    /// Playback configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Active playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Current playlist index
    pub fn current_index(&self) -> Option<usize> {
        self.playlist.index()
    }

    /// Current playlist track
    pub fn current_track(&self) -> Option<&TrackId> {
        self.playlist.current()
    }

    /// Index space in use
    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    /// Shuffle flag
    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat-one flag
    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    /// Whether the widget reported `Ready`
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the player panel is open
    pub fn is_player_open(&self) -> bool {
        self.player_open
    }

    /// Current track generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Metadata cache
    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Underlying widget
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Underlying widget (mutable)
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    // ===== Internal =====

    fn start_current(&mut self) {
        if let Some(id) = self.playlist.current().cloned() {
            self.start_track(id);
        }
    }

    fn start_track(&mut self, id: TrackId) {
        self.mode = PlayerMode::Playlist;
        let index = self
            .playlist
            .current()
            .filter(|current| **current == id)
            .and_then(|_| self.playlist.index());

        if self.ready {
            self.widget.load_by_id(&id);
            self.bump_generation();
        } else {
            tracing::debug!("Widget not ready, deferring load of {}", id);
            self.generation += 1;
            self.pending_load = Some(id.clone());
        }

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: id,
            index,
            mode: PlayerMode::Playlist,
        });
    }

    fn step_widget_queue(&mut self, forward: bool) {
        if !self.require_ready() {
            return;
        }
        if forward {
            self.widget.next_video();
        } else {
            self.widget.previous_video();
        }
        self.bump_generation();
    }

    /// New track generation with a metadata refresh queued for it
    fn bump_generation(&mut self) {
        self.generation += 1;
        self.deferred.push(Deferred::RefreshMetadata {
            generation: self.generation,
        });
    }

    fn require_ready(&mut self) -> bool {
        if !self.ready {
            self.warn("Player not ready yet");
        }
        self.ready
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!("{}", message);
        self.pending_events.push(PlaybackEvent::Warning {
            message: message.to_string(),
        });
    }

    fn emit_modifiers(&mut self) {
        self.pending_events.push(PlaybackEvent::ModifiersChanged {
            shuffle: self.shuffle,
            repeat: self.repeat,
        });
    }
}
