//! Playback service
//!
//! Runs a [`PlaybackController`] on a tokio task. Everything that mutates
//! playback (user commands, widget notifications, finished searches, delayed
//! metadata refreshes) arrives through one channel and is applied in order.
//! Events are broadcast to subscribers; a snapshot of the current state is
//! published through a watch channel.

use crate::controller::{Deferred, PlaybackController};
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::types::{PlaybackState, PlayerMode};
use crate::widget::{PlayerWidget, WidgetEvent};
use cupid_core::{CupidError, MetadataLookup, TrackId, TrackMetadata, TrackSearch};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 128;

/// Commands accepted by the playback service
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Skip to next track
    Next,
    /// Go to previous track
    Previous,
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle play/pause
    TogglePlayback,
    /// Toggle shuffle
    ToggleShuffle,
    /// Toggle repeat-one
    ToggleRepeat,
    /// Play an explicit track
    LoadTrack(TrackId),
    /// Jump to a playlist position
    Select(usize),
    /// Search and play the result; a cached playlist match is used only
    /// when the search comes back empty
    PlayQuery(String),
    /// Search and play the result after the current track
    Search(String),
    /// Hand a list of results to the widget's queue
    PlaySearchResults(Vec<TrackId>),
    /// Seek to a percentage of the track
    SeekPercent(f32),
    /// Set volume (0-100)
    SetVolume(u8),
    /// Open the player panel
    OpenPlayer,
    /// Close the player panel
    ClosePlayer,
    /// Notification from the widget
    Widget(WidgetEvent),
    /// Stop the service
    Shutdown,
}

/// Point-in-time view of playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// Widget has reported ready
    pub ready: bool,
    /// Last reported state
    pub state: PlaybackState,
    /// Playing or buffering
    pub is_playing: bool,
    /// Index space in use
    pub mode: PlayerMode,
    /// Playlist index
    pub index: Option<usize>,
    /// Playlist track at the index
    pub track_id: Option<TrackId>,
    /// Shuffle flag
    pub shuffle: bool,
    /// Repeat flag
    pub repeat: bool,
    /// Player panel open
    pub player_open: bool,
}

impl<W: PlayerWidget> From<&PlaybackController<W>> for PlaybackSnapshot {
    fn from(controller: &PlaybackController<W>) -> Self {
        Self {
            ready: controller.is_ready(),
            state: controller.current_state(),
            is_playing: controller.is_playing(),
            mode: controller.mode(),
            index: controller.current_index(),
            track_id: controller.current_track().cloned(),
            shuffle: controller.is_shuffle(),
            repeat: controller.is_repeat(),
            player_open: controller.is_player_open(),
        }
    }
}

/// Results of background work, fed back into the loop
#[derive(Debug)]
enum Internal {
    SearchCompleted {
        query: String,
        result: cupid_core::Result<Option<TrackId>>,
        local_fallback: bool,
    },
    RefreshMetadata {
        generation: u64,
    },
    SkipAfterError {
        generation: u64,
    },
    CacheMetadata {
        track_id: TrackId,
        metadata: TrackMetadata,
    },
}

#[derive(Debug)]
enum Message {
    Command(PlaybackCommand),
    Internal(Internal),
}

/// Cloneable handle for talking to a running [`PlaybackService`]
#[derive(Clone)]
pub struct PlaybackHandle {
    tx: mpsc::Sender<Message>,
    events: broadcast::Sender<PlaybackEvent>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    /// Send a command to the service
    pub async fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.tx
            .send(Message::Command(command))
            .await
            .map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Forward a widget notification
    pub async fn widget_event(&self, event: WidgetEvent) -> Result<()> {
        self.send(PlaybackCommand::Widget(event)).await
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch snapshot changes
    pub fn watch(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    /// Whether playback is currently active
    pub fn is_playing(&self) -> bool {
        self.snapshot.borrow().is_playing
    }
}

/// Task owning the playback controller
pub struct PlaybackService<W: PlayerWidget> {
    controller: PlaybackController<W>,
    search: Option<Arc<dyn TrackSearch>>,
    lookup: Option<Arc<dyn MetadataLookup>>,
    rx: mpsc::Receiver<Message>,
    loopback: mpsc::WeakSender<Message>,
    events: broadcast::Sender<PlaybackEvent>,
    snapshot: watch::Sender<PlaybackSnapshot>,
}

impl<W: PlayerWidget + 'static> PlaybackService<W> {
    /// Create the service and a handle to it
    ///
    /// The service stops when every handle has been dropped or on
    /// [`PlaybackCommand::Shutdown`].
    pub fn new(controller: PlaybackController<W>) -> (Self, PlaybackHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (snapshot, snapshot_rx) = watch::channel(PlaybackSnapshot::from(&controller));

        let handle = PlaybackHandle {
            tx: tx.clone(),
            events: events.clone(),
            snapshot: snapshot_rx,
        };

        let service = Self {
            controller,
            search: None,
            lookup: None,
            rx,
            loopback: tx.downgrade(),
            events,
            snapshot,
        };

        (service, handle)
    }

    /// Use a search collaborator for `Search`/`PlayQuery`
    pub fn with_search(mut self, search: Arc<dyn TrackSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Prefetch playlist metadata through a lookup collaborator
    pub fn with_lookup(mut self, lookup: Arc<dyn MetadataLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Spawn the service loop
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the service loop until shutdown
    pub async fn run(mut self) {
        tracing::info!(
            "Playback service started ({} tracks)",
            self.controller.playlist().len()
        );
        self.prefetch_metadata();

        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Command(PlaybackCommand::Shutdown) => break,
                Message::Command(command) => self.handle_command(command),
                Message::Internal(internal) => self.handle_internal(internal),
            }
            self.schedule_deferred();
            self.publish();
        }

        tracing::info!("Playback service stopped");
    }

    fn handle_command(&mut self, command: PlaybackCommand) {
        tracing::debug!("Playback command: {:?}", command);
        match command {
            PlaybackCommand::Next => self.controller.next(),
            PlaybackCommand::Previous => self.controller.previous(),
            PlaybackCommand::Play => self.controller.play(),
            PlaybackCommand::Pause => self.controller.pause(),
            PlaybackCommand::TogglePlayback => self.controller.toggle_playback(),
            PlaybackCommand::ToggleShuffle => {
                self.controller.toggle_shuffle();
            }
            PlaybackCommand::ToggleRepeat => {
                self.controller.toggle_repeat();
            }
            PlaybackCommand::LoadTrack(id) => self.controller.load_track(id),
            PlaybackCommand::Select(index) => {
                if let Err(e) = self.controller.select(index) {
                    tracing::warn!("Select failed: {}", e);
                }
            }
            PlaybackCommand::PlayQuery(query) => self.start_search(query, true),
            PlaybackCommand::Search(query) => self.start_search(query, false),
            PlaybackCommand::PlaySearchResults(ids) => {
                if let Err(e) = self.controller.play_search_results(ids) {
                    tracing::warn!("Cannot play search results: {}", e);
                }
            }
            PlaybackCommand::SeekPercent(percent) => {
                if let Err(e) = self.controller.seek_percent(percent) {
                    tracing::warn!("Seek failed: {}", e);
                }
            }
            PlaybackCommand::SetVolume(volume) => self.controller.set_volume(volume),
            PlaybackCommand::OpenPlayer => self.controller.open_player(),
            PlaybackCommand::ClosePlayer => self.controller.close_player(),
            PlaybackCommand::Widget(event) => self.controller.on_widget_event(event),
            PlaybackCommand::Shutdown => {}
        }
    }

    fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::SearchCompleted {
                query,
                result,
                local_fallback,
            } => self.finish_search(&query, result, local_fallback),
            Internal::RefreshMetadata { generation } => {
                self.controller.refresh_metadata(generation);
            }
            Internal::SkipAfterError { generation } => {
                self.controller.skip_after_error(generation);
            }
            Internal::CacheMetadata { track_id, metadata } => {
                self.controller.cache_metadata(track_id, metadata);
            }
        }
    }

    fn start_search(&mut self, query: String, local_fallback: bool) {
        let Some(search) = self.search.clone() else {
            let result = Err(CupidError::Other("music search is not configured".to_string()));
            self.finish_search(&query, result, local_fallback);
            return;
        };

        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let result = search.search(&query).await;
            let internal = Internal::SearchCompleted {
                query,
                result,
                local_fallback,
            };
            send_internal(&loopback, internal).await;
        });
    }

    fn finish_search(
        &mut self,
        query: &str,
        result: cupid_core::Result<Option<TrackId>>,
        local_fallback: bool,
    ) {
        if local_fallback && !matches!(result, Ok(Some(_))) {
            if let Some(id) = self.controller.find_track_by_query(query) {
                tracing::info!("Search '{}' came back empty, playing playlist track {}", query, id);
                self.controller.load_track(id);
                return;
            }
        }
        self.controller.apply_search_result(query, result);
    }

    fn schedule_deferred(&mut self) {
        for deferred in self.controller.take_deferred() {
            let delay = deferred.delay(self.controller.config());
            let internal = match deferred {
                Deferred::RefreshMetadata { generation } => Internal::RefreshMetadata { generation },
                Deferred::SkipAfterError { generation } => Internal::SkipAfterError { generation },
            };
            let loopback = self.loopback.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                send_internal(&loopback, internal).await;
            });
        }
    }

    fn prefetch_metadata(&self) {
        let Some(lookup) = self.lookup.clone() else {
            return;
        };
        let tracks = self.controller.tracks_missing_metadata();
        if tracks.is_empty() {
            return;
        }

        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            for track_id in tracks {
                match lookup.lookup(&track_id).await {
                    Ok(Some(metadata)) if metadata.has_title() => {
                        let message = Internal::CacheMetadata { track_id, metadata };
                        if !send_internal(&loopback, message).await {
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::debug!("Metadata prefetch for {} failed: {}", track_id, e),
                }
            }
        });
    }

    fn publish(&mut self) {
        for event in self.controller.drain_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        let snapshot = PlaybackSnapshot::from(&self.controller);
        self.snapshot.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Send an internal message if the service is still running
async fn send_internal(loopback: &mpsc::WeakSender<Message>, internal: Internal) -> bool {
    let Some(tx) = loopback.upgrade() else {
        return false;
    };
    tx.send(Message::Internal(internal)).await.is_ok()
}

