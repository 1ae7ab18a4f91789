/// Server services
pub mod file_storage;
pub mod gateway;
pub mod prompts;
pub mod search;

pub use file_storage::FileStorage;
pub use gateway::{GatewayError, GroqProvider, PromptGateway, PromptPair, TextGenerator};
pub use search::YoutubeScraper;
