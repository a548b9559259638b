//! AI Provider Port - Interface for generative text and image services.
//!
//! Every prompt-driven collaborator (topic generation, intent classification,
//! guide writing, welcome replies) goes through `AIProvider`; reference images
//! go through `ImageGenerator`. Failures are `AIError`, which knows which of
//! them are transient.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::text("hello", "echo"))
//!     }
//!
//!     fn model(&self) -> &str {
//!         "echo"
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::SessionId;

/// Port for text completions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// One completion attempt. Retrying is the caller's business.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Model that serves completions, for logs.
    fn model(&self) -> &str;
}

/// Port for reference image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and return where it can be downloaded.
    ///
    /// The returned URL may be temporary; callers copy it to object storage.
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, AIError>;
}

/// A prompt for one collaborator.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Earlier dialogue followed by the prompt itself.
    pub messages: Vec<Message>,
    /// Standing instructions, sent ahead of `messages`.
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the provider to return a single JSON object.
    pub json_response: bool,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            json_response: false,
            metadata,
        }
    }

    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_json_response(mut self) -> Self {
        self.json_response = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Who is asking, carried into logs and used by test doubles for routing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Absent for metadata jobs, which are shared across sessions.
    pub session_id: Option<SessionId>,
    /// Which collaborator is calling (e.g. "intent_classifier").
    pub purpose: &'static str,
}

impl RequestMetadata {
    pub fn new(purpose: &'static str) -> Self {
        Self {
            session_id: None,
            purpose,
        }
    }

    pub fn for_session(purpose: &'static str, session_id: &SessionId) -> Self {
        Self {
            session_id: Some(session_id.clone()),
            purpose,
        }
    }
}

/// Text produced for a `CompletionRequest`.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    /// The model hit `max_tokens` before finishing.
    pub truncated: bool,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            truncated: false,
        }
    }
}

/// Request for one generated image.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    /// Provider size string such as "1024x1024".
    pub size: Option<String>,
    pub metadata: RequestMetadata,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            prompt: prompt.into(),
            size: None,
            metadata,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// A generated image, not yet copied to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Download URL (possibly short-lived).
    pub url: String,
}

/// Failures of a generative service.
///
/// Clone so one failed metadata job can be reported to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// The provider refused the prompt or its output.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    /// The response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// One attempt took longer than the retry policy allows.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
