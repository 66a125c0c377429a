use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, SearchResult,
};

/// Retrieval over one open collection: embed the query, rank stored chunks
/// by similarity.
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl RagService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding,
            vector_store,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(&embedding, top_k).await
    }

    /// Concatenates the top-k chunk texts most-similar-first, separated by
    /// blank lines. Whitespace-only chunks are skipped; no matches yield an
    /// empty string, never an error.
    #[instrument(skip(self))]
    pub async fn retrieve_context(&self, query: &str, top_k: usize) -> Result<String, DomainError> {
        let results = self.retrieve_top_k(query, top_k).await?;

        Ok(results
            .iter()
            .map(|result| result.chunk.content.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, Embedding};
    use crate::infrastructure::vector_store::InMemoryVectorStore;
    use async_trait::async_trait;

    struct AxisEmbedder;

    #[async_trait]
    impl EmbeddingService for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            // Maps "x"-ish text onto the first axis, everything else onto the
            // second, which is enough to steer the ranking in tests.
            if text.contains('x') {
                Ok(Embedding::new(vec![1.0, 0.0]))
            } else {
                Ok(Embedding::new(vec![0.0, 1.0]))
            }
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            let mut embeddings = Vec::with_capacity(texts.len());
            for text in texts {
                embeddings.push(self.embed(text).await?);
            }
            Ok(embeddings)
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    async fn seeded_store() -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        let entries = vec![
            (
                DocumentChunk::new("a", "xxx marks the spot", 0),
                Embedding::new(vec![1.0, 0.0]),
            ),
            (
                DocumentChunk::new("a", "plain other words", 1),
                Embedding::new(vec![0.0, 1.0]),
            ),
        ];
        store.upsert(&entries).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_retrieve_context_ranks_most_similar_first() {
        let rag = RagService::new(Arc::new(AxisEmbedder), seeded_store().await);

        let context = rag.retrieve_context("x", 2).await.unwrap();
        assert!(context.starts_with("xxx marks the spot"));
        assert!(context.contains("\n\n"));
    }

    #[tokio::test]
    async fn test_retrieve_context_empty_collection() {
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(Arc::new(AxisEmbedder), store);

        let context = rag.retrieve_context("x", 5).await.unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_retrieve_top_k_caps_results() {
        let rag = RagService::new(Arc::new(AxisEmbedder), seeded_store().await);

        let results = rag.retrieve_top_k("x", 1).await.unwrap();
        assert_eq!(results.len(), 1);

        // Fewer stored chunks than top_k: return all of them.
        let results = rag.retrieve_top_k("x", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
