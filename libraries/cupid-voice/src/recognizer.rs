//! Speech recognition engine abstraction
//!
//! The engine runs one recognition cycle per `start`. It reports progress as
//! [`RecognitionEvent`]s over a channel handed to the supervisor, and must
//! finish every cycle with [`RecognitionEvent::Ended`], including cycles that
//! failed.

use crate::error::Result;

/// One-shot speech recognition engine
pub trait SpeechRecognizer: Send {
    /// Whether the host supports speech recognition at all
    fn is_available(&self) -> bool;

    /// Locale for the next cycle (e.g. "en-IN")
    fn set_language(&mut self, language: &str);

    /// Begin a recognition cycle
    fn start(&mut self) -> Result<()>;

    /// Abort the current cycle
    fn stop(&mut self);
}

/// Why a recognition cycle failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Nothing was said
    NoSpeech,

    /// The cycle was aborted by `stop`
    Aborted,

    /// Microphone access was denied
    NotAllowed,

    /// Engine-reported failure
    Other(String),
}

/// Notifications from the recognition engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Microphone open, cycle running
    Started,

    /// Final transcript for the cycle
    Result(String),

    /// Cycle failed
    Error(RecognitionError),

    /// Cycle finished
    Ended,
}
