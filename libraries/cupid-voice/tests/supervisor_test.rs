//! Tests for the voice supervisor loop

use cupid_voice::{
    RecognitionError, RecognitionEvent, SpeechRecognizer, VoiceCommand, VoiceConfig, VoiceError,
    VoiceSupervisor,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ===== Fake recognizer =====

#[derive(Debug, Clone, PartialEq, Eq)]
enum RecognizerCall {
    Language(String),
    Start,
    Stop,
}

#[derive(Clone)]
struct FakeRecognizer {
    calls: Arc<Mutex<Vec<RecognizerCall>>>,
    available: bool,
    fail_start: bool,
}

impl FakeRecognizer {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            available: true,
            fail_start: false,
        }
    }

    fn calls(&self) -> Vec<RecognizerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn starts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == RecognizerCall::Start)
            .count()
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn set_language(&mut self, language: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(RecognizerCall::Language(language.to_string()));
    }

    fn start(&mut self) -> cupid_voice::Result<()> {
        if self.fail_start {
            return Err(VoiceError::Recognizer("already started".into()));
        }
        self.calls.lock().unwrap().push(RecognizerCall::Start);
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push(RecognizerCall::Stop);
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

async fn cycle(events: &mpsc::Sender<RecognitionEvent>, transcript: &str) {
    events.send(RecognitionEvent::Started).await.unwrap();
    events
        .send(RecognitionEvent::Result(transcript.to_string()))
        .await
        .unwrap();
    events.send(RecognitionEvent::Ended).await.unwrap();
}

// ===== Tests =====

#[tokio::test(start_paused = true)]
async fn missing_capability_leaves_voice_off() {
    let recognizer = FakeRecognizer {
        available: false,
        ..FakeRecognizer::new()
    };
    let (_events_tx, events_rx) = mpsc::channel(8);
    let (commands_tx, _commands_rx) = mpsc::channel::<VoiceCommand>(8);

    let (supervisor, _handle) = VoiceSupervisor::new(
        recognizer.clone(),
        events_rx,
        commands_tx,
        VoiceConfig::default(),
    );
    supervisor.run().await;

    assert!(recognizer.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wake_phrase_commands_are_forwarded() {
    let recognizer = FakeRecognizer::new();
    let (events_tx, events_rx) = mpsc::channel(8);
    let (commands_tx, mut commands_rx) = mpsc::channel(8);
    let (supervisor, _handle) = VoiceSupervisor::new(
        recognizer.clone(),
        events_rx,
        commands_tx,
        VoiceConfig::default(),
    );
    let task = supervisor.spawn();

    settle().await;
    assert_eq!(
        recognizer.calls(),
        vec![
            RecognizerCall::Language("en-US".into()),
            RecognizerCall::Start
        ]
    );

    cycle(&events_tx, "pause").await;
    cycle(&events_tx, "hey cupid next song").await;

    assert_eq!(commands_rx.recv().await, Some(VoiceCommand::Next));
    assert!(commands_rx.try_recv().is_err());

    // Listener restarts itself after each cycle
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(recognizer.starts(), 3);

    drop(events_tx);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_session_pauses_then_searches() {
    let recognizer = FakeRecognizer::new();
    let (events_tx, events_rx) = mpsc::channel(8);
    let (commands_tx, mut commands_rx) = mpsc::channel(8);
    let (supervisor, handle) = VoiceSupervisor::new(
        recognizer.clone(),
        events_rx,
        commands_tx,
        VoiceConfig::default(),
    );
    let task = supervisor.spawn();

    events_tx.send(RecognitionEvent::Started).await.unwrap();
    settle().await;

    handle.manual_start().await.unwrap();
    assert_eq!(commands_rx.recv().await, Some(VoiceCommand::Pause));
    settle().await;
    assert_eq!(handle.status(), "Listening...");
    assert_eq!(recognizer.calls().last(), Some(&RecognizerCall::Stop));

    // Background cycle ends, manual cycle starts; no wake phrase needed
    events_tx
        .send(RecognitionEvent::Error(RecognitionError::Aborted))
        .await
        .unwrap();
    events_tx.send(RecognitionEvent::Ended).await.unwrap();
    settle().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(recognizer.starts(), 2);

    cycle(&events_tx, "play tum hi ho").await;
    assert_eq!(
        commands_rx.recv().await,
        Some(VoiceCommand::Search("tum hi ho".into()))
    );
    assert_eq!(handle.status(), "\"play tum hi ho\"");

    drop(events_tx);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn refused_start_disables_listening() {
    let recognizer = FakeRecognizer {
        fail_start: true,
        ..FakeRecognizer::new()
    };
    let (events_tx, events_rx) = mpsc::channel(8);
    let (commands_tx, _commands_rx) = mpsc::channel::<VoiceCommand>(8);
    let (supervisor, handle) = VoiceSupervisor::new(
        recognizer.clone(),
        events_rx,
        commands_tx,
        VoiceConfig::default(),
    );
    let task = supervisor.spawn();

    settle().await;
    handle.manual_start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(handle.status(), "Voice unavailable.");
    assert_eq!(recognizer.starts(), 0);

    drop(events_tx);
    task.await.unwrap();
}

#[cfg(feature = "playback")]
mod with_playback {
    use super::*;
    use cupid_core::TrackId;
    use cupid_playback::{
        PlaybackConfig, PlaybackController, PlaybackService, PlayerWidget, VideoData, WidgetEvent,
    };

    #[derive(Default)]
    struct SilentWidget;

    impl PlayerWidget for SilentWidget {
        fn load_by_id(&mut self, _id: &TrackId) {}
        fn load_playlist(&mut self, _ids: &[TrackId]) {}
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek_to(&mut self, _position: Duration) {}
        fn current_time(&self) -> Duration {
            Duration::ZERO
        }
        fn duration(&self) -> Option<Duration> {
            None
        }
        fn video_data(&self) -> Option<VideoData> {
            None
        }
        fn next_video(&mut self) {}
        fn previous_video(&mut self) {}
        fn set_volume(&mut self, _volume: u8) {}
    }

    #[tokio::test(start_paused = true)]
    async fn voice_commands_drive_playback() {
        let config = PlaybackConfig {
            random_start: false,
            ..PlaybackConfig::default()
        };
        let (service, playback) =
            PlaybackService::new(PlaybackController::new(SilentWidget, config));
        let playback_task = service.spawn();
        playback.widget_event(WidgetEvent::Ready).await.unwrap();

        let recognizer = FakeRecognizer::new();
        let (events_tx, events_rx) = mpsc::channel(8);
        let (supervisor, _voice) = VoiceSupervisor::new(
            recognizer,
            events_rx,
            playback.clone(),
            VoiceConfig::default(),
        );
        let voice_task = supervisor.spawn();

        cycle(&events_tx, "hey cupid next").await;
        cycle(&events_tx, "baby open the player").await;
        settle().await;

        let snapshot = playback.snapshot();
        assert_eq!(snapshot.index, Some(1));
        assert!(snapshot.player_open);

        drop(events_tx);
        voice_task.await.unwrap();
        playback
            .send(cupid_playback::PlaybackCommand::Shutdown)
            .await
            .unwrap();
        playback_task.await.unwrap();
    }

    #[test]
    fn spoken_songs_go_to_search() {
        assert_eq!(
            cupid_playback::PlaybackCommand::from(VoiceCommand::Search("shape of you".into())),
            cupid_playback::PlaybackCommand::Search("shape of you".into())
        );
        assert_eq!(
            cupid_playback::PlaybackCommand::from(VoiceCommand::Resume),
            cupid_playback::PlaybackCommand::Play
        );
    }
}
