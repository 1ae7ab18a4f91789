//! Shared test helpers for playback tests

#![allow(dead_code)]

use async_trait::async_trait;
use cupid_core::{CupidError, MetadataLookup, TrackId, TrackMetadata, TrackSearch};
use cupid_playback::{
    PlaybackConfig, PlaybackController, PlaybackState, PlayerWidget, VideoData, WidgetEvent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Mock widget =====

/// Command received by the mock widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    Load(String),
    LoadPlaylist(Vec<String>),
    Play,
    Pause,
    Seek(Duration),
    NextVideo,
    PreviousVideo,
    Volume(u8),
}

#[derive(Debug, Default)]
struct WidgetInner {
    calls: Vec<WidgetCall>,
    state: Option<PlaybackState>,
    video: Option<VideoData>,
    duration: Option<Duration>,
    position: Duration,
}

/// Recording widget; clones share the same log so tests can inspect a
/// widget that has been moved into a service task
#[derive(Debug, Clone, Default)]
pub struct MockWidget {
    inner: Arc<Mutex<WidgetInner>>,
}

impl MockWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WidgetCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn loaded(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WidgetCall::Load(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn set_state(&self, state: Option<PlaybackState>) {
        self.inner.lock().unwrap().state = state;
    }

    pub fn set_video(&self, id: &str, title: &str, author: &str) {
        self.inner.lock().unwrap().video = Some(VideoData {
            track_id: TrackId::new(id),
            title: title.to_string(),
            author: author.to_string(),
        });
    }

    pub fn set_duration(&self, duration: Duration, position: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.duration = Some(duration);
        inner.position = position;
    }

    fn record(&self, call: WidgetCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl PlayerWidget for MockWidget {
    fn load_by_id(&mut self, id: &TrackId) {
        self.record(WidgetCall::Load(id.to_string()));
    }

    fn load_playlist(&mut self, ids: &[TrackId]) {
        self.record(WidgetCall::LoadPlaylist(
            ids.iter().map(ToString::to_string).collect(),
        ));
    }

    fn play(&mut self) {
        self.record(WidgetCall::Play);
    }

    fn pause(&mut self) {
        self.record(WidgetCall::Pause);
    }

    fn seek_to(&mut self, position: Duration) {
        self.record(WidgetCall::Seek(position));
    }

    fn current_time(&self) -> Duration {
        self.inner.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        self.inner.lock().unwrap().duration
    }

    fn video_data(&self) -> Option<VideoData> {
        self.inner.lock().unwrap().video.clone()
    }

    fn state(&self) -> Option<PlaybackState> {
        self.inner.lock().unwrap().state
    }

    fn next_video(&mut self) {
        self.record(WidgetCall::NextVideo);
    }

    fn previous_video(&mut self) {
        self.record(WidgetCall::PreviousVideo);
    }

    fn set_volume(&mut self, volume: u8) {
        self.record(WidgetCall::Volume(volume));
    }
}

// ===== Fixtures =====

pub fn track(i: usize) -> TrackId {
    TrackId::new(format!("track{i:02}"))
}

pub fn tracks(n: usize) -> Vec<TrackId> {
    (0..n).map(track).collect()
}

/// Deterministic config: `n` tracks, starting at index 0
pub fn config(n: usize) -> PlaybackConfig {
    PlaybackConfig {
        playlist: tracks(n),
        random_start: false,
        ..PlaybackConfig::default()
    }
}

pub fn controller(n: usize) -> (PlaybackController<MockWidget>, MockWidget) {
    let widget = MockWidget::new();
    let controller =
        PlaybackController::with_rng(widget.clone(), config(n), StdRng::seed_from_u64(7));
    (controller, widget)
}

/// Controller whose widget is ready, with setup calls and events cleared
pub fn ready_controller(n: usize) -> (PlaybackController<MockWidget>, MockWidget) {
    let (mut controller, widget) = controller(n);
    controller.on_widget_event(WidgetEvent::Ready);
    controller.drain_events();
    controller.take_deferred();
    widget.clear_calls();
    (controller, widget)
}

// ===== Collaborator fakes =====

/// Search returning a fixed answer and counting calls
pub struct FixedSearch {
    result: Option<TrackId>,
    pub calls: AtomicUsize,
}

impl FixedSearch {
    pub fn found(id: &str) -> Self {
        Self {
            result: Some(TrackId::new(id)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TrackSearch for FixedSearch {
    async fn search(&self, _query: &str) -> cupid_core::Result<Option<TrackId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Search that always fails
pub struct BrokenSearch;

#[async_trait]
impl TrackSearch for BrokenSearch {
    async fn search(&self, _query: &str) -> cupid_core::Result<Option<TrackId>> {
        Err(CupidError::network("connection refused"))
    }
}

/// Lookup answering "Song <id>" for every track
pub struct TitleLookup {
    pub calls: AtomicUsize,
}

impl TitleLookup {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataLookup for TitleLookup {
    async fn lookup(&self, id: &TrackId) -> cupid_core::Result<Option<TrackMetadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(TrackMetadata::new(format!("Song {id}"), "Cupid Records")))
    }
}

/// Lookup answering from a fixed id -> title table
pub struct CatalogLookup {
    titles: Vec<(TrackId, String)>,
}

impl CatalogLookup {
    pub fn new(titles: &[(&str, &str)]) -> Self {
        Self {
            titles: titles
                .iter()
                .map(|(id, title)| (TrackId::new(*id), (*title).to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl MetadataLookup for CatalogLookup {
    async fn lookup(&self, id: &TrackId) -> cupid_core::Result<Option<TrackMetadata>> {
        Ok(self
            .titles
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, title)| TrackMetadata::new(title.clone(), "")))
    }
}
