//! Error types for voice control

use thiserror::Error;

/// Voice control errors
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The recognition engine refused to start
    #[error("Recognizer error: {0}")]
    Recognizer(String),

    /// The command sink is gone
    #[error("Command sink closed")]
    SinkClosed,
}

/// Result type for voice operations
pub type Result<T> = std::result::Result<T, VoiceError>;
