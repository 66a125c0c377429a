use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Sampling parameters forwarded to the completion endpoint.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1200,
        }
    }
}

/// A remote completion endpoint: prompt in, generated text out. Returns an
/// empty string when the provider produced no content.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, DomainError>;
}
