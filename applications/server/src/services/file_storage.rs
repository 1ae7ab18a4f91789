/// File storage service - manages uploaded photos on disk
use crate::error::{Result, ServerError};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Extensions accepted for photo uploads
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp"];

/// URL prefix uploaded files are served under
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    max_bytes: usize,
}

impl FileStorage {
    pub fn new(base_path: PathBuf, max_bytes: usize) -> Self {
        Self {
            base_path,
            max_bytes,
        }
    }

    /// Initialize storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store an uploaded photo and return its public URL path
    ///
    /// The stored name is `<unix-millis>-<uuid>.<ext>`; the client's file
    /// name only contributes its extension.
    pub async fn store_photo(&self, original_name: &str, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
        }
        if data.len() > self.max_bytes {
            return Err(ServerError::BadRequest(format!(
                "File too large (limit {} bytes)",
                self.max_bytes
            )));
        }

        let extension = image_extension(original_name).ok_or_else(|| {
            ServerError::BadRequest(format!("Not an image file: {}", original_name))
        })?;

        let filename = unique_filename(&extension);
        let path = self.base_path.join(&filename);

        // Ensure directory exists
        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, data).await?;

        tracing::info!(file = %filename, bytes = data.len(), "Photo stored");
        Ok(format!("{}/{}", UPLOADS_ROUTE, filename))
    }

    /// Resolve a stored file name, refusing anything outside the storage dir
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = self.base_path.join(filename);
        self.validate_path(&path)?;
        Ok(path)
    }

    /// Validate that a path is within the storage directory (prevent directory traversal)
    pub fn validate_path(&self, path: &Path) -> Result<()> {
        let canonical_base = self
            .base_path
            .canonicalize()
            .map_err(|e| ServerError::Storage(format!("Invalid base path: {}", e)))?;

        let canonical_path = path
            .canonicalize()
            .map_err(|_| ServerError::NotFound(format!("No such file: {}", path.display())))?;

        if !canonical_path.starts_with(&canonical_base) {
            return Err(ServerError::BadRequest(
                "Path traversal attempt detected".to_string(),
            ));
        }

        Ok(())
    }
}

/// Lowercased image extension of a client-supplied file name
pub fn image_extension(name: &str) -> Option<String> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

fn unique_filename(extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}-{}.{}", millis, uuid::Uuid::new_v4().simple(), extension)
}
