use crate::domain::{errors::DomainError, DocumentChunk, Embedding, SearchResult};
use async_trait::async_trait;

/// A handle bound to one open collection of embedded chunks.
///
/// Collection lifecycle (create, delete, list) lives on the concrete store
/// client; the services only ever see an opened collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, entries: &[(DocumentChunk, Embedding)]) -> Result<(), DomainError>;
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}
