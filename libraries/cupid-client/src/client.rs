//! Main Cupid backend client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, Envelope, MusicSearchRequest, UploadResponse};
use async_trait::async_trait;
use cupid_core::{Feature, TrackId, TrackSearch, TriviaQuestion};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the Cupid backend API.
///
/// Wraps the generation endpoints, music search and photo upload. It also
/// implements [`TrackSearch`], so a playback service can search through the
/// backend instead of scraping on its own.
///
/// # Example
///
/// ```ignore
/// use cupid_client::{ClientConfig, CupidClient};
/// use cupid_core::Feature;
///
/// let client = CupidClient::new(ClientConfig::new("http://localhost:3000"))?;
/// let letter = client
///     .generate(Feature::LoveLetter, &serde_json::json!({ "keywords": "rain, chai" }))
///     .await?;
/// println!("{letter}");
/// ```
#[derive(Clone)]
pub struct CupidClient {
    http: Client,
    base_url: String,
}

impl CupidClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Cupid/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// The backend URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a text generation feature and return the generated text.
    ///
    /// `body` carries the feature's fields, e.g. `{ "keywords": "..." }` for
    /// the love letter. Use [`CupidClient::trivia`] for the structured quiz.
    pub async fn generate<B>(&self, feature: Feature, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        debug!(feature = %feature, "Requesting generation");
        self.post_json(&format!("/api/{}", feature.slug()), body)
            .await
    }

    /// Fetch a fresh trivia quiz.
    ///
    /// Every question is validated; one bad question fails the whole quiz.
    pub async fn trivia(&self) -> Result<Vec<TriviaQuestion>> {
        let questions: Vec<TriviaQuestion> = self
            .post_json(
                &format!("/api/{}", Feature::Trivia.slug()),
                &serde_json::json!({}),
            )
            .await?;

        if questions.is_empty() {
            return Err(ClientError::ParseError("trivia quiz is empty".into()));
        }
        for question in &questions {
            question
                .validate()
                .map_err(|e| ClientError::ParseError(e.to_string()))?;
        }

        info!(count = questions.len(), "Trivia quiz received");
        Ok(questions)
    }

    /// Search for a song through the backend.
    ///
    /// Returns `Ok(None)` when the backend found nothing.
    pub async fn music_search(&self, query: &str) -> Result<Option<TrackId>> {
        let url = format!("{}/api/music-search", self.base_url);
        let response = self
            .send(self.http.post(&url).json(&MusicSearchRequest { query }))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(query = %query, "Song not found");
            return Ok(None);
        }

        let id: String = Self::read_envelope(response).await?;
        Ok(Some(TrackId::new(id)))
    }

    /// Upload a photo and return its public path (`/uploads/<name>`).
    pub async fn upload_photo(&self, file_path: &Path) -> Result<String> {
        if !file_path.exists() {
            return Err(ClientError::FileNotFound(file_path.display().to_string()));
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();
        let contents = tokio::fs::read(file_path).await?;
        let size = contents.len();

        let part = Part::bytes(contents)
            .file_name(file_name.clone())
            .mime_str(mime_type_for_file(file_path))?;
        let form = Form::new().part("photo", part);

        let url = format!("{}/upload", self.base_url);
        let response = self.send(self.http.post(&url).multipart(form)).await?;
        let status = response.status();

        let body: UploadResponse = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse upload response: {}", e))
        })?;

        match body {
            UploadResponse {
                success: true,
                file_path: Some(path),
                ..
            } => {
                info!(file = %file_name, size, path = %path, "Photo uploaded");
                Ok(path)
            }
            UploadResponse { message, .. } => Err(ClientError::ServerError {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| "Upload failed".to_string()),
            }),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.send(self.http.post(&url).json(body)).await?;
        Self::read_envelope(response).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }

    /// Unwrap a `{ result }` / `{ error }` body.
    async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        let envelope: Envelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(ClientError::ParseError(e.to_string()));
            }
            Err(_) => {
                return Err(ClientError::ServerError {
                    status: status.as_u16(),
                    message: text,
                });
            }
        };

        if let Some(message) = envelope.error {
            warn!(status = status.as_u16(), error = %message, "Backend reported an error");
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        envelope
            .result
            .ok_or_else(|| ClientError::ParseError("response has no result".into()))
    }
}

#[async_trait]
impl TrackSearch for CupidClient {
    async fn search(&self, query: &str) -> cupid_core::Result<Option<TrackId>> {
        Ok(self.music_search(query).await?)
    }
}

/// Guess MIME type from file extension.
fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
