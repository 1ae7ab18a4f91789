/// Shared application state
use crate::services::{FileStorage, PromptGateway};
use cupid_core::TrackSearch;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PromptGateway>,
    pub search: Arc<dyn TrackSearch>,
    pub file_storage: Arc<FileStorage>,
    /// Static site served at `/`
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(
        gateway: Arc<PromptGateway>,
        search: Arc<dyn TrackSearch>,
        file_storage: Arc<FileStorage>,
        public_dir: PathBuf,
    ) -> Self {
        Self {
            gateway,
            search,
            file_storage,
            public_dir,
        }
    }
}
