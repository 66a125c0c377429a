use std::sync::Arc;

use tracing::instrument;

use crate::application::prompt::build_rag_prompt;
use crate::application::services::rag::RagService;
use crate::domain::{
    ports::{CompletionOptions, LlmService},
    DomainError,
};

/// Returned without any retrieval or completion call for blank questions.
pub const EMPTY_QUERY_MESSAGE: &str = "سوال خالی است. لطفا سوال خود را وارد کنید.";

/// Returned when the completion endpoint produced no text.
pub const NO_ANSWER_MESSAGE: &str = "پاسخی تولید نشد.";

/// Per-question knobs.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOptions {
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        let completion = CompletionOptions::default();
        Self {
            top_k: 5,
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
        }
    }
}

/// Orchestrates one question: retrieve context, build the prompt, call the
/// completion endpoint, normalize the answer text.
///
/// There is no retry or timeout around the remote call; a failure surfaces
/// to the caller, and the interactive loop prints it and carries on.
pub struct AnswerService {
    rag: RagService,
    llm: Arc<dyn LlmService>,
}

impl AnswerService {
    pub fn new(rag: RagService, llm: Arc<dyn LlmService>) -> Self {
        Self { rag, llm }
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str, options: &AnswerOptions) -> Result<String, DomainError> {
        if query.trim().is_empty() {
            return Ok(EMPTY_QUERY_MESSAGE.to_string());
        }

        let context = self.rag.retrieve_context(query, options.top_k).await?;
        let prompt = build_rag_prompt(query, &context);

        let completion = CompletionOptions {
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };
        let text = self.llm.complete(&prompt, &completion).await?;

        if text.trim().is_empty() {
            Ok(NO_ANSWER_MESSAGE.to_string())
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::EmbeddingService;
    use crate::domain::Embedding;
    use crate::infrastructure::vector_store::InMemoryVectorStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EmbeddingService for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Embedding::new(vec![1.0, 0.0]); texts.len()])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct CountingLlm {
        calls: AtomicUsize,
        reply: String,
    }

    impl CountingLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            })
        }
    }

    #[async_trait]
    impl LlmService for CountingLlm {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn service(
        embedder: Arc<CountingEmbedder>,
        llm: Arc<CountingLlm>,
    ) -> AnswerService {
        let rag = RagService::new(embedder, Arc::new(InMemoryVectorStore::new()));
        AnswerService::new(rag, llm)
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        let embedder = CountingEmbedder::new();
        let llm = CountingLlm::replying("ignored");
        let answer_service = service(embedder.clone(), llm.clone());

        for query in ["", "   ", "\n\t"] {
            let answer = answer_service
                .answer(query, &AnswerOptions::default())
                .await
                .unwrap();
            assert_eq!(answer, EMPTY_QUERY_MESSAGE);
        }

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_completion_maps_to_fixed_message() {
        let answer_service = service(CountingEmbedder::new(), CountingLlm::replying("  "));

        let answer = answer_service
            .answer("سوالی دارم", &AnswerOptions::default())
            .await
            .unwrap();
        assert_eq!(answer, NO_ANSWER_MESSAGE);
    }

    #[tokio::test]
    async fn test_answer_passes_completion_text_through() {
        let answer_service = service(CountingEmbedder::new(), CountingLlm::replying("پاسخ کامل"));

        let answer = answer_service
            .answer("سوالی دارم", &AnswerOptions::default())
            .await
            .unwrap();
        assert_eq!(answer, "پاسخ کامل");
    }
}
