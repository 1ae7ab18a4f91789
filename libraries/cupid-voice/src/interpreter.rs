//! Voice session state machine
//!
//! Pure logic: the interpreter consumes recognizer events and user controls
//! and answers with [`VoiceAction`]s for the supervisor to carry out. It never
//! starts a new recognition cycle while one is in flight; restarts requested
//! mid-cycle are held until the engine reports `Ended`.

use crate::command::{contains_wake_phrase, parse_command, VoiceCommand};
use crate::recognizer::{RecognitionError, RecognitionEvent};
use std::time::Duration;

/// Listening mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceSession {
    /// Not listening
    Inactive,

    /// Perpetual listening, acting only on wake phrases
    BackgroundListening,

    /// One-shot listening after the user pressed the mic button
    ManualListening,
}

/// Effect requested by the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceAction {
    /// Start a recognition cycle after `delay`
    StartRecognition {
        /// Locale to recognize
        language: String,
        /// Wait before starting
        delay: Duration,
    },

    /// Abort the running cycle
    StopRecognition,

    /// Pause music for a manual session
    PausePlayback,

    /// Execute a recognized command
    Dispatch(VoiceCommand),

    /// Message for the user (manual sessions only)
    Status(String),
}

/// Voice interpreter configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Locales tried in order when nothing was heard (default: en-US, en-IN, hi-IN)
    pub languages: Vec<String>,

    /// Same-locale retries once the locale list is exhausted (default: 1)
    pub same_language_retries: u32,

    /// Delay before retrying in the next locale (default: 400ms)
    pub language_retry_delay: Duration,

    /// Delay before a same-locale retry (default: 500ms)
    pub same_language_retry_delay: Duration,

    /// Delay before a manual cycle starts (default: 100ms)
    pub manual_start_delay: Duration,

    /// Delay before background listening restarts (default: 250ms)
    pub restart_delay: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en-US".into(), "en-IN".into(), "hi-IN".into()],
            same_language_retries: 1,
            language_retry_delay: Duration::from_millis(400),
            same_language_retry_delay: Duration::from_millis(500),
            manual_start_delay: Duration::from_millis(100),
            restart_delay: Duration::from_millis(250),
        }
    }
}

/// Voice session state machine
#[derive(Debug)]
pub struct VoiceInterpreter {
    config: VoiceConfig,
    session: VoiceSession,

    /// A recognition cycle is running (or has been requested)
    active: bool,

    language_index: usize,
    retries: u32,

    /// Music was playing when the manual session began
    was_playing: bool,

    /// Start to issue once the running cycle ends
    pending_start: Option<Duration>,
}

impl VoiceInterpreter {
    /// Create an inactive interpreter
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            session: VoiceSession::Inactive,
            active: false,
            language_index: 0,
            retries: 0,
            was_playing: false,
            pending_start: None,
        }
    }

    /// Current session
    pub fn session(&self) -> VoiceSession {
        self.session
    }

    /// Whether a recognition cycle is in flight
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Locale the next cycle will use
    pub fn language(&self) -> &str {
        self.config
            .languages
            .get(self.language_index)
            .map_or("en-US", String::as_str)
    }

    /// Whether music was playing when the last manual session began
    pub fn was_playing(&self) -> bool {
        self.was_playing
    }

    /// Enter background listening
    pub fn start(&mut self) -> Vec<VoiceAction> {
        self.session = VoiceSession::BackgroundListening;
        self.reset_ladder();
        self.request_start(Duration::ZERO).into_iter().collect()
    }

    /// Stop listening entirely
    pub fn stop(&mut self) -> Vec<VoiceAction> {
        self.session = VoiceSession::Inactive;
        self.pending_start = None;
        if self.active {
            vec![VoiceAction::StopRecognition]
        } else {
            Vec::new()
        }
    }

    /// Mic button pressed
    ///
    /// Starts a one-shot manual cycle, pausing music if it is playing. Pressing
    /// again during a manual session stops it.
    pub fn manual_start(&mut self, is_playing: bool) -> Vec<VoiceAction> {
        if self.session == VoiceSession::ManualListening {
            self.pending_start = None;
            return if self.active {
                vec![VoiceAction::StopRecognition]
            } else {
                self.session = VoiceSession::BackgroundListening;
                self.request_start(self.config.restart_delay)
                    .into_iter()
                    .collect()
            };
        }

        let mut actions = Vec::new();
        self.session = VoiceSession::ManualListening;
        self.was_playing = is_playing;
        self.reset_ladder();

        if is_playing {
            actions.push(VoiceAction::PausePlayback);
        }
        actions.push(VoiceAction::Status("Listening...".to_string()));

        if self.active {
            // Background cycle still running; start once it has ended
            actions.push(VoiceAction::StopRecognition);
            self.pending_start = Some(self.config.manual_start_delay);
        } else {
            actions.extend(self.request_start(self.config.manual_start_delay));
        }
        actions
    }

    /// Handle a recognizer notification
    pub fn on_event(&mut self, event: RecognitionEvent) -> Vec<VoiceAction> {
        match event {
            RecognitionEvent::Started => {
                self.active = true;
                Vec::new()
            }
            RecognitionEvent::Result(transcript) => self.on_result(&transcript),
            RecognitionEvent::Error(error) => self.on_error(error),
            RecognitionEvent::Ended => self.on_ended(),
        }
    }

    /// The engine refused to start; voice control switches off
    pub fn on_start_failed(&mut self) -> Vec<VoiceAction> {
        let manual = self.session == VoiceSession::ManualListening;
        self.active = false;
        self.pending_start = None;
        self.session = VoiceSession::Inactive;
        if manual {
            vec![VoiceAction::Status("Voice unavailable.".to_string())]
        } else {
            Vec::new()
        }
    }

    fn on_result(&mut self, transcript: &str) -> Vec<VoiceAction> {
        self.reset_ladder();

        match self.session {
            VoiceSession::ManualListening => {
                let mut actions = vec![VoiceAction::Status(format!("\"{transcript}\""))];
                if let Some(command) = parse_command(transcript) {
                    actions.push(VoiceAction::Dispatch(command));
                }
                actions
            }
            VoiceSession::BackgroundListening => {
                if !contains_wake_phrase(transcript) {
                    tracing::debug!("Ignoring transcript without wake phrase: {}", transcript);
                    return Vec::new();
                }
                parse_command(transcript)
                    .map(VoiceAction::Dispatch)
                    .into_iter()
                    .collect()
            }
            VoiceSession::Inactive => Vec::new(),
        }
    }

    fn on_error(&mut self, error: RecognitionError) -> Vec<VoiceAction> {
        let manual = self.session == VoiceSession::ManualListening;
        let mut status = None;

        match error {
            RecognitionError::NoSpeech => {
                if self.language_index + 1 < self.config.languages.len() {
                    self.language_index += 1;
                    self.pending_start = Some(self.config.language_retry_delay);
                    status = Some(format!("No speech, retrying ({})...", self.language()));
                } else if self.retries < self.config.same_language_retries {
                    self.retries += 1;
                    self.pending_start = Some(self.config.same_language_retry_delay);
                    status = Some("No speech detected, retrying...".to_string());
                } else {
                    self.reset_ladder();
                    status = Some("No speech detected.".to_string());
                }
            }
            RecognitionError::NotAllowed => {
                tracing::warn!("Microphone access denied, voice control off");
                self.session = VoiceSession::Inactive;
                self.pending_start = None;
                if manual {
                    status = Some("Microphone access is required for voice commands.".to_string());
                }
            }
            RecognitionError::Aborted => {}
            RecognitionError::Other(message) => {
                tracing::warn!("Recognition error: {}", message);
                status = Some("Error. Try again.".to_string());
            }
        }

        match status {
            Some(status) if manual => vec![VoiceAction::Status(status)],
            _ => Vec::new(),
        }
    }

    fn on_ended(&mut self) -> Vec<VoiceAction> {
        self.active = false;

        if let Some(delay) = self.pending_start.take() {
            return self.request_start(delay).into_iter().collect();
        }

        match self.session {
            VoiceSession::Inactive => Vec::new(),
            VoiceSession::ManualListening => {
                self.session = VoiceSession::BackgroundListening;
                self.request_start(self.config.restart_delay)
                    .into_iter()
                    .collect()
            }
            VoiceSession::BackgroundListening => self
                .request_start(self.config.restart_delay)
                .into_iter()
                .collect(),
        }
    }

    /// Start a cycle unless one is already running
    fn request_start(&mut self, delay: Duration) -> Option<VoiceAction> {
        if self.active || self.session == VoiceSession::Inactive {
            return None;
        }
        self.active = true;
        Some(VoiceAction::StartRecognition {
            language: self.language().to_string(),
            delay,
        })
    }

    fn reset_ladder(&mut self) {
        self.language_index = 0;
        self.retries = 0;
    }
}

impl Default for VoiceInterpreter {
    fn default() -> Self {
        Self::new(VoiceConfig::default())
    }
}
