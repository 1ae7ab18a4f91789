//! Cupid - Voice Control
//!
//! Hands-free control of the Cupid music widget.
//!
//! This crate provides:
//! - Transcript normalization and intent matching ([`parse_command`])
//! - A pure session state machine ([`VoiceInterpreter`]) covering background
//!   wake-phrase listening, one-shot manual sessions and no-speech retries
//! - An async [`VoiceSupervisor`] that owns the recognition engine and
//!   forwards commands to a [`CommandSink`]
//!
//! With the `playback` feature (on by default) a
//! `cupid_playback::PlaybackHandle` is a command sink.
//!
//! # Example
//!
//! ```rust
//! use cupid_voice::{parse_command, VoiceCommand};
//!
//! assert_eq!(parse_command("hey cupid pause"), Some(VoiceCommand::Pause));
//! assert_eq!(
//!     parse_command("play shape of you"),
//!     Some(VoiceCommand::Search("shape of you".to_string()))
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod interpreter;
pub mod recognizer;
pub mod supervisor;

pub use command::{contains_wake_phrase, normalize, parse_command, VoiceCommand};
pub use error::{Result, VoiceError};
pub use interpreter::{VoiceAction, VoiceConfig, VoiceInterpreter, VoiceSession};
pub use recognizer::{RecognitionError, RecognitionEvent, SpeechRecognizer};
pub use supervisor::{CommandSink, VoiceControl, VoiceHandle, VoiceSupervisor};
