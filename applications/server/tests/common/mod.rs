//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use cupid_core::{TrackId, TrackSearch};
use cupid_server::{
    config::GatewaySettings,
    create_router,
    services::{FileStorage, GatewayError, PromptGateway, TextGenerator},
    AppState,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Reply = Result<String, GatewayError>;

/// Generator that replays scripted replies and records prompts
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Box<dyn Fn() -> Reply + Send + Sync>,
    prompts: Mutex<Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    /// Always answers `text`
    pub fn always(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::build(Vec::new(), move || Ok(text.clone()))
    }

    /// Always rate limited
    pub fn rate_limited() -> Arc<Self> {
        Self::build(Vec::new(), || Err(GatewayError::RateLimited))
    }

    /// Replies in order, then fails with an upstream error
    pub fn sequence(replies: Vec<Reply>) -> Arc<Self> {
        Self::build(replies, || {
            Err(GatewayError::Upstream {
                status: 500,
                message: "script exhausted".into(),
            })
        })
    }

    fn build(replies: Vec<Reply>, fallback: impl Fn() -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            fallback: Box::new(fallback),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, system: &str, user: &str) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| (self.fallback)())
    }
}

/// Search double answering from a fixed id
pub struct FixedSearch(pub Option<&'static str>);

#[async_trait]
impl TrackSearch for FixedSearch {
    async fn search(&self, _query: &str) -> cupid_core::Result<Option<TrackId>> {
        Ok(self.0.map(TrackId::new))
    }
}

/// Gateway with instant backoff
pub fn gateway(generator: Arc<ScriptedGenerator>) -> PromptGateway {
    PromptGateway::new(
        generator,
        &GatewaySettings {
            max_attempts: 3,
            backoff_unit_ms: 1,
        },
    )
}

/// Router wired to test doubles; keep the `TempDir` alive for the test
pub fn test_app(generator: Arc<ScriptedGenerator>, search: FixedSearch) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let uploads = temp_dir.path().join("uploads");
    let public = temp_dir.path().join("public");
    std::fs::create_dir_all(&uploads).unwrap();
    std::fs::create_dir_all(&public).unwrap();
    std::fs::write(public.join("index.html"), "<h1>Be my Valentine?</h1>").unwrap();

    let state = AppState::new(
        Arc::new(gateway(generator)),
        Arc::new(search),
        Arc::new(FileStorage::new(uploads, 1024)),
        public,
    );
    (create_router(state), temp_dir)
}

pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Multipart body with a single file field
pub fn multipart_upload(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let boundary = "cupid-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .uri("/upload")
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
