//! Cupid Server Library
//!
//! Backend for the Valentine's site: AI text generation through a rate-limit
//! aware prompt gateway, music search, photo upload and static hosting.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{
    file_storage::FileStorage, gateway::PromptGateway, search::YoutubeScraper,
};
pub use state::AppState;
