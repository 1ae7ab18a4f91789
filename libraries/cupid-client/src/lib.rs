//! Cupid Backend Client
//!
//! HTTP client library for the Cupid backend API.
//!
//! # Features
//!
//! - **Generation**: every `/api/<feature>` text endpoint, plus the trivia quiz
//! - **Music search**: resolves a free-text query to a track id
//! - **Upload**: photo upload through the multipart endpoint
//! - **Metadata**: oEmbed title/author lookup for playlist entries
//!
//! `CupidClient` implements `TrackSearch` and `OEmbedLookup` implements
//! `MetadataLookup`, so both plug straight into a playback service.
//!
//! # Example
//!
//! ```ignore
//! use cupid_client::{ClientConfig, CupidClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CupidClient::new(ClientConfig::new("http://localhost:3000"))?;
//!
//!     match client.music_search("tum hi ho").await? {
//!         Some(id) => println!("Playing {}", id),
//!         None => println!("Song not found"),
//!     }
//!
//!     let quiz = client.trivia().await?;
//!     println!("{} questions", quiz.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod oembed;
mod types;

pub use client::CupidClient;
pub use error::{ClientError, Result};
pub use oembed::{OEmbedLookup, DEFAULT_OEMBED_ENDPOINT};
pub use types::{ClientConfig, UploadResponse};
