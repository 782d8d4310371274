//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for the text-extraction oracle
///
/// Implemented by the infrastructure layer (quadros-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the prompt
    ///
    /// Implementations issue exactly one request; retry policy belongs to
    /// the caller.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model behind this provider, for logs
    fn model_name(&self) -> &str;
}
