//! Voice supervisor
//!
//! Async loop owning the recognizer and the interpreter. Recognizer events
//! and user controls are processed one at a time and the resulting actions
//! are carried out in order, so restarts, pauses and dispatches never
//! interleave.

use crate::command::VoiceCommand;
use crate::error::{Result, VoiceError};
use crate::interpreter::{VoiceAction, VoiceConfig, VoiceInterpreter, VoiceSession};
use crate::recognizer::{RecognitionEvent, SpeechRecognizer};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Where recognized commands go
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Execute a recognized command
    async fn dispatch(&self, command: VoiceCommand) -> Result<()>;

    /// Pause music for a manual listening session
    async fn pause_playback(&self) -> Result<()> {
        self.dispatch(VoiceCommand::Pause).await
    }

    /// Whether music is playing right now
    fn is_playing(&self) -> bool;
}

#[async_trait]
impl CommandSink for mpsc::Sender<VoiceCommand> {
    async fn dispatch(&self, command: VoiceCommand) -> Result<()> {
        self.send(command).await.map_err(|_| VoiceError::SinkClosed)
    }

    /// Playback state is unknown through a bare channel; assume playing so
    /// a manual session always pauses.
    fn is_playing(&self) -> bool {
        true
    }
}

/// User controls for the voice supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceControl {
    /// Mic button pressed
    ManualStart,

    /// Stop listening
    Stop,
}

/// Handle to a running [`VoiceSupervisor`]
#[derive(Clone)]
pub struct VoiceHandle {
    controls: mpsc::Sender<VoiceControl>,
    status: watch::Receiver<String>,
}

impl VoiceHandle {
    /// Press the mic button
    pub async fn manual_start(&self) -> Result<()> {
        self.send(VoiceControl::ManualStart).await
    }

    /// Stop listening
    pub async fn stop(&self) -> Result<()> {
        self.send(VoiceControl::Stop).await
    }

    async fn send(&self, control: VoiceControl) -> Result<()> {
        self.controls
            .send(control)
            .await
            .map_err(|_| VoiceError::SinkClosed)
    }

    /// Latest user-facing status line
    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    /// Watch status changes
    pub fn watch_status(&self) -> watch::Receiver<String> {
        self.status.clone()
    }
}

/// Task owning the recognizer and interpreter
pub struct VoiceSupervisor<R: SpeechRecognizer, S: CommandSink> {
    recognizer: R,
    sink: S,
    interpreter: VoiceInterpreter,
    events: mpsc::Receiver<RecognitionEvent>,
    controls: mpsc::Receiver<VoiceControl>,
    status: watch::Sender<String>,
}

impl<R, S> VoiceSupervisor<R, S>
where
    R: SpeechRecognizer + 'static,
    S: CommandSink + 'static,
{
    /// Create a supervisor fed by the recognizer's event channel
    pub fn new(
        recognizer: R,
        events: mpsc::Receiver<RecognitionEvent>,
        sink: S,
        config: VoiceConfig,
    ) -> (Self, VoiceHandle) {
        let (controls_tx, controls) = mpsc::channel(16);
        let (status, status_rx) = watch::channel(String::new());

        let supervisor = Self {
            recognizer,
            sink,
            interpreter: VoiceInterpreter::new(config),
            events,
            controls,
            status,
        };
        let handle = VoiceHandle {
            controls: controls_tx,
            status: status_rx,
        };
        (supervisor, handle)
    }

    /// Spawn the supervisor loop
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until the recognizer's event channel closes
    ///
    /// Returns immediately, leaving voice control off, when the host has no
    /// speech recognition.
    pub async fn run(mut self) {
        if !self.recognizer.is_available() {
            tracing::info!("Speech recognition unavailable, voice control disabled");
            return;
        }

        tracing::info!("Voice control listening in background");
        let actions = self.interpreter.start();
        self.execute(actions).await;

        loop {
            let actions = tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        tracing::debug!("Recognition event: {:?}", event);
                        self.interpreter.on_event(event)
                    }
                    None => break,
                },
                Some(control) = self.controls.recv() => match control {
                    VoiceControl::ManualStart => {
                        let playing = self.sink.is_playing();
                        self.interpreter.manual_start(playing)
                    }
                    VoiceControl::Stop => self.interpreter.stop(),
                },
            };
            self.execute(actions).await;
        }

        if self.interpreter.session() != VoiceSession::Inactive {
            self.recognizer.stop();
        }
        tracing::info!("Voice control stopped");
    }

    async fn execute(&mut self, actions: Vec<VoiceAction>) {
        let mut queue: VecDeque<VoiceAction> = actions.into();

        while let Some(action) = queue.pop_front() {
            match action {
                VoiceAction::StartRecognition { language, delay } => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    self.recognizer.set_language(&language);
                    if let Err(e) = self.recognizer.start() {
                        tracing::warn!("Recognition start failed: {}", e);
                        queue.extend(self.interpreter.on_start_failed());
                    }
                }
                VoiceAction::StopRecognition => self.recognizer.stop(),
                VoiceAction::PausePlayback => {
                    if let Err(e) = self.sink.pause_playback().await {
                        tracing::warn!("Could not pause for voice session: {}", e);
                    }
                }
                VoiceAction::Dispatch(command) => {
                    tracing::info!("Voice command: {:?}", command);
                    if let Err(e) = self.sink.dispatch(command).await {
                        tracing::warn!("Voice command dropped: {}", e);
                    }
                }
                VoiceAction::Status(status) => {
                    tracing::debug!("Voice status: {}", status);
                    self.status.send_replace(status);
                }
            }
        }
    }
}

#[cfg(feature = "playback")]
mod playback_sink {
    use super::CommandSink;
    use crate::command::VoiceCommand;
    use crate::error::{Result, VoiceError};
    use async_trait::async_trait;
    use cupid_playback::{PlaybackCommand, PlaybackHandle};

    impl From<VoiceCommand> for PlaybackCommand {
        fn from(command: VoiceCommand) -> Self {
            match command {
                VoiceCommand::Next => PlaybackCommand::Next,
                VoiceCommand::Previous => PlaybackCommand::Previous,
                VoiceCommand::Pause => PlaybackCommand::Pause,
                VoiceCommand::Resume => PlaybackCommand::Play,
                VoiceCommand::OpenPlayer => PlaybackCommand::OpenPlayer,
                VoiceCommand::ClosePlayer => PlaybackCommand::ClosePlayer,
                VoiceCommand::ToggleShuffle => PlaybackCommand::ToggleShuffle,
                VoiceCommand::Search(query) => PlaybackCommand::Search(query),
            }
        }
    }

    #[async_trait]
    impl CommandSink for PlaybackHandle {
        async fn dispatch(&self, command: VoiceCommand) -> Result<()> {
            self.send(command.into())
                .await
                .map_err(|_| VoiceError::SinkClosed)
        }

        fn is_playing(&self) -> bool {
            PlaybackHandle::is_playing(self)
        }
    }
}
