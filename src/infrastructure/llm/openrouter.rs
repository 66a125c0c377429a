use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::{
    ports::{CompletionOptions, LlmService},
    DomainError, Message,
};

/// Chat-completion client for OpenRouter, or any other OpenAI-compatible
/// endpoint reachable at `{base_url}/chat/completions` with bearer auth.
///
/// No retry, backoff or timeout: a hung remote call blocks the caller, and
/// a failed one surfaces as `ExternalService`.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmService for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, DomainError> {
        let body = json!({
            "model": self.model,
            "messages": [Message::user(prompt)],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let url = self.completions_url();
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::external(format!(
                "completion endpoint returned {status}: {text}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("malformed completion response: {e}")))?;

        let choice = payload["choices"]
            .get(0)
            .ok_or_else(|| DomainError::external("no choices in completion response"))?;

        Ok(choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_normalizes_trailing_slash() {
        let client = OpenRouterClient::new("key", "https://openrouter.ai/api/v1/", "model");
        assert_eq!(
            client.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
