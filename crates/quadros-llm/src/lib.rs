//! Quadros LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `quadros-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API integration
//!
//! # Examples
//!
//! ```
//! use quadros_llm::MockProvider;
//! use quadros_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use quadros_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// What the mock does when a prompt matches a rule
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Rules
/// match when the prompt *contains* the registered needle, which lets a test
/// key a response on a decree number embedded in the fragment text. The first
/// matching rule wins; unmatched prompts get the default response.
///
/// # Examples
///
/// ```
/// use quadros_llm::MockProvider;
/// use quadros_domain::traits::LlmProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut provider = MockProvider::new("{\"decretos\": []}");
/// provider.add_response("13/2023", "first");
/// provider.add_response("14/2023", "second");
/// assert_eq!(provider.generate("... DECRETO Nº 13/2023 ...").await.unwrap(), "first");
/// assert_eq!(provider.generate("... DECRETO Nº 14/2023 ...").await.unwrap(), "second");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Respond with `response` to any prompt containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Error));
    }

    /// Sleep before every reply, to exercise caller timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        *self.call_count.lock().unwrap() += 1;

        let rules = self.rules.lock().unwrap();
        rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let reply = self.reply_for(prompt);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo!").await.unwrap(), "bar");
        assert_eq!(
            provider.generate("unknown").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_first_rule_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("13/2023", "first");
        provider.add_response("DECRETO", "second");

        assert_eq!(
            provider.generate("DECRETO Nº 13/2023").await.unwrap(),
            "first"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("a bad prompt").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_delay() {
        let provider = MockProvider::new("slow").with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        assert_eq!(provider.generate("x").await.unwrap(), "slow");
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
