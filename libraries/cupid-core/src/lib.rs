//! Cupid Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by the
//! Cupid server, the backend client, and the playback/voice libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `TrackMetadata`, `TriviaQuestion`, `Feature`
//! - **Collaborator Traits**: `TrackSearch`, `MetadataLookup`
//! - **Error Handling**: Unified `CupidError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cupid_core::{Feature, TrackId};
//!
//! let feature = Feature::from_slug("love-letter").unwrap();
//! assert_eq!(feature.slug(), "love-letter");
//!
//! let id = TrackId::parse("h1Fxjmg_KL4").unwrap();
//! assert_eq!(id.as_str(), "h1Fxjmg_KL4");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CupidError, Result};
pub use traits::{MetadataLookup, TrackSearch};
pub use types::{Feature, TrackId, TrackMetadata, TriviaQuestion, TRIVIA_LABELS};
