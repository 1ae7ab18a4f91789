/// Prompt gateway: the single path to the text-generation provider
use crate::config::{GatewaySettings, ProviderSettings};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Provider asked us to slow down; the only retryable failure
    #[error("Rate limited by the text generation provider")]
    RateLimited,

    /// `message` is the provider's raw body, kept for logs only
    #[error("The text generation provider failed (HTTP {status}), please try again")]
    Upstream { status: u16, message: String },

    #[error("Could not reach the text generation provider: {0}")]
    Transport(String),

    #[error("Provider returned an empty completion")]
    EmptyCompletion,

    #[error("No provider API key is set, check your configuration")]
    MissingApiKey,

    #[error("Still rate limited after {attempts} attempts, try again in a minute")]
    RetriesExhausted { attempts: u32 },
}

/// A system + user prompt for one generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Provider seam
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One completion attempt, no retries
    async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError>;

    /// Whether the provider has the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }
}

// =============================================================================
// Chat completions wire types
// =============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Groq (OpenAI-compatible) chat completions provider
pub struct GroqProvider {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: settings.api_key.trim().to_string(),
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl TextGenerator for GroqProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatRequestMessage {
                    role: "system",
                    content: system,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %message, "Provider returned an error");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("invalid provider response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GatewayError::EmptyCompletion)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Retries rate-limited generations with linear backoff
///
/// Attempt `n` that is rate limited waits `n × backoff_unit` before the next
/// one. Every other failure is returned immediately.
#[derive(Clone)]
pub struct PromptGateway {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
    backoff_unit: Duration,
}

impl PromptGateway {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: &GatewaySettings) -> Self {
        Self {
            generator,
            max_attempts: settings.max_attempts.max(1),
            backoff_unit: settings.backoff_unit(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    pub async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        for attempt in 1..=self.max_attempts {
            match self.generator.complete(system, user).await {
                Ok(text) => {
                    tracing::debug!(attempt, chars = text.len(), "Generation succeeded");
                    return Ok(text.trim().to_string());
                }
                Err(GatewayError::RateLimited) if attempt < self.max_attempts => {
                    let delay = self.backoff_unit * attempt;
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Provider rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(GatewayError::RateLimited) => break,
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Generation failed");
                    return Err(e);
                }
            }
        }

        tracing::error!(attempts = self.max_attempts, "Rate limit retries exhausted");
        Err(GatewayError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Convenience wrapper for a built prompt
    pub async fn generate_prompt(&self, prompt: &PromptPair) -> Result<String, GatewayError> {
        self.generate(&prompt.system, &prompt.user).await
    }
}
