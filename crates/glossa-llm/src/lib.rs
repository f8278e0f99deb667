//! Glossa LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` trait from `glossa-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted mock for testing (response queues, failure
//!   injection, call counting)
//! - `GeminiProvider`: Hosted generateContent API with response-schema
//!   support
//!
//! Retry, backoff, and per-attempt timeouts are the extraction client's job;
//! providers here make exactly one network call per invocation.

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use glossa_domain::traits::LlmProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing from the environment
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Scripted LLM provider for deterministic testing
///
/// Returns queued responses in order, falling back to a default response once
/// the queue is drained. Clones share state, so a test can hold one handle
/// while the code under test owns another.
///
/// # Examples
///
/// ```
/// use glossa_llm::MockProvider;
/// use glossa_domain::traits::LlmProvider;
///
/// # async fn example() {
/// let provider = MockProvider::new("{\"terms\":[]}");
/// provider.push_error("transient failure");
///
/// // First call fails, second returns the default
/// assert!(provider.generate("p").await.is_err());
/// assert!(provider.generate("p").await.is_ok());
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    fail_always: bool,
    queue: Arc<Mutex<VecDeque<Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a provider with a fixed default response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            fail_always: false,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a provider that fails every call with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        let mut provider = Self::new("");
        provider.fail_always = true;
        provider.default_response = message.into();
        provider
    }

    /// Queue a successful response ahead of the default
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failing call ahead of the default
    pub fn push_error(&self, message: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Err(message.into()));
    }

    /// Number of calls made so far (generate and generate_structured)
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// The most recent prompt passed to the provider
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if self.fail_always {
            return Err(LlmError::Other(self.default_response.clone()));
        }

        match self.queue.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.next_response(prompt)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema_json: &str,
    ) -> Result<String, Self::Error> {
        // The mock does not enforce the schema; tests script the exact shape
        self.next_response(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_queue_order() {
        let provider = MockProvider::new("default");
        provider.push_response("first");
        provider.push_response("second");

        assert_eq!(provider.generate("p").await.unwrap(), "first");
        assert_eq!(provider.generate("p").await.unwrap(), "second");
        assert_eq!(provider.generate("p").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_mock_error_injection() {
        let provider = MockProvider::new("ok");
        provider.push_error("boom");

        let result = provider.generate("p").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
        assert_eq!(provider.generate("p").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_mock_failing_always_fails() {
        let provider = MockProvider::failing("down");
        for _ in 0..3 {
            assert!(provider.generate("p").await.is_err());
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_call_count_and_last_prompt() {
        let provider = MockProvider::new("r");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt one").await.unwrap();
        provider
            .generate_structured("prompt two", "{}")
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt two"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_clone_shares_state() {
        let provider1 = MockProvider::new("r");
        let provider2 = provider1.clone();

        provider1.generate("p").await.unwrap();
        assert_eq!(provider2.call_count(), 1);
    }
}
