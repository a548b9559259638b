//! Mock AI Provider for testing.
//!
//! Provides configurable mock implementations of the `AIProvider` and
//! `ImageGenerator` ports, allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, optionally routed by request purpose
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response_for("intent_classifier", r#"{"confirmedTopic":true}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, GeneratedImage, ImageGenerator,
    ImageRequest,
};

/// Content returned once every queue is empty.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

const MOCK_MODEL: &str = "mock-model-1";

type Queue = VecDeque<Result<String, AIError>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock AI provider for testing.
///
/// Responses queued for a purpose are served to requests carrying that
/// purpose; everything else is served from the shared queue, then the
/// default response.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    shared: Arc<Mutex<Queue>>,
    by_purpose: Arc<Mutex<HashMap<&'static str, Queue>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(VecDeque::new())),
            by_purpose: Arc::new(Mutex::new(HashMap::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the shared queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.shared).push_back(Ok(content.into()));
        self
    }

    /// Adds an error to the shared queue.
    pub fn with_error(self, error: AIError) -> Self {
        lock(&self.shared).push_back(Err(error));
        self
    }

    /// Adds a successful response served only to requests for `purpose`.
    pub fn with_response_for(self, purpose: &'static str, content: impl Into<String>) -> Self {
        self.push_for(purpose, Ok(content.into()))
    }

    /// Adds an error served only to requests for `purpose`.
    pub fn with_error_for(self, purpose: &'static str, error: AIError) -> Self {
        self.push_for(purpose, Err(error))
    }

    /// Queues more responses on an existing (shared) mock.
    pub fn push_response_for(&self, purpose: &'static str, content: impl Into<String>) {
        lock(&self.by_purpose)
            .entry(purpose)
            .or_default()
            .push_back(Ok(content.into()));
    }

    pub fn push_error_for(&self, purpose: &'static str, error: AIError) {
        lock(&self.by_purpose).entry(purpose).or_default().push_back(Err(error));
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of calls made for `purpose`.
    pub fn calls_for(&self, purpose: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.metadata.purpose == purpose)
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    fn push_for(self, purpose: &'static str, item: Result<String, AIError>) -> Self {
        lock(&self.by_purpose).entry(purpose).or_default().push_back(item);
        self
    }

    fn next_response(&self, purpose: &str) -> Result<String, AIError> {
        if let Some(item) = lock(&self.by_purpose)
            .get_mut(purpose)
            .and_then(VecDeque::pop_front)
        {
            return item;
        }
        lock(&self.shared)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_MOCK_RESPONSE.to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let purpose = request.metadata.purpose;
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_response(purpose)
            .map(|content| CompletionResponse::text(content, MOCK_MODEL))
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}

/// Mock image generator returning predictable URLs.
#[derive(Debug, Clone, Default)]
pub struct MockImageGenerator {
    errors: Arc<Mutex<VecDeque<AIError>>>,
    delay: Duration,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next call with `error`.
    pub fn with_error(self, error: AIError) -> Self {
        lock(&self.errors).push_back(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, AIError> {
        let n = {
            let mut prompts = lock(&self.prompts);
            prompts.push(request.prompt);
            prompts.len()
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(err) = lock(&self.errors).pop_front() {
            return Err(err);
        }
        Ok(GeneratedImage {
            url: format!("https://images.mock/generated/{}.png", n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MessageRole, RequestMetadata};

    fn request(purpose: &'static str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(purpose)).with_message(MessageRole::User, "Hello")
    }

    #[tokio::test]
    async fn returns_responses_in_order_then_default() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        assert_eq!(provider.complete(request("a")).await.unwrap().content, "First");
        assert_eq!(provider.complete(request("a")).await.unwrap().content, "Second");
        assert_eq!(provider.complete(request("a")).await.unwrap().content, DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn routes_by_purpose_before_shared_queue() {
        let provider = MockAIProvider::new()
            .with_response("shared")
            .with_response_for("classifier", "routed");

        assert_eq!(provider.complete(request("other")).await.unwrap().content, "shared");
        assert_eq!(provider.complete(request("classifier")).await.unwrap().content, "routed");
        assert_eq!(provider.calls_for("classifier"), 1);
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider = MockAIProvider::new().with_error(AIError::rate_limited(30));

        let err = provider.complete(request("a")).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn tracks_calls() {
        let provider = MockAIProvider::new();
        assert_eq!(provider.call_count(), 0);
        provider.complete(request("a")).await.unwrap();
        provider.complete(request("b")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.get_calls()[1].metadata.purpose, "b");
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(50));
        let start = std::time::Instant::now();
        provider.complete(request("a")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn image_generator_counts_and_fails_on_demand() {
        let images = MockImageGenerator::new().with_error(AIError::unavailable("down"));

        let req = || ImageRequest::new("a pear", RequestMetadata::new("reference_image"));
        assert!(images.generate_image(req()).await.is_err());
        let ok = images.generate_image(req()).await.unwrap();
        assert_eq!(ok.url, "https://images.mock/generated/2.png");
        assert_eq!(images.call_count(), 2);
    }
}
