use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

/// Ephemeral store used by unit tests and experiments; same semantics as
/// the disk store minus persistence.
pub struct InMemoryVectorStore {
    records: RwLock<Vec<(DocumentChunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, entries: &[(DocumentChunk, Embedding)]) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        for (chunk, embedding) in entries {
            records.retain(|(existing, _)| existing.id != chunk.id);
            records.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = records
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, content: &str, vector: Vec<f32>) -> (DocumentChunk, Embedding) {
        (
            DocumentChunk::new("doc", content, index),
            Embedding::new(vector),
        )
    }

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                entry(0, "east", vec![1.0, 0.0]),
                entry(1, "north", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store
            .search(&Embedding::new(vec![1.0, 0.0]), 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "east");
        assert!((results[0].score - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_id() {
        let store = InMemoryVectorStore::new();
        let first = entry(0, "same text", vec![1.0, 0.0]);
        store.upsert(std::slice::from_ref(&first)).await.unwrap();
        store.upsert(std::slice::from_ref(&first)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
    }
}
