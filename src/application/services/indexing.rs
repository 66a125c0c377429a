use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{
    chunk_document,
    ports::{EmbeddingService, VectorStore},
    Document, DomainError,
};

/// Chunking parameters for one indexing run.
#[derive(Debug, Clone, Copy)]
pub struct IndexParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Counters reported back to the caller after a build.
#[derive(Debug, Default)]
pub struct IndexStats {
    pub documents_indexed: usize,
    pub chunks_indexed: usize,
}

/// Progress events emitted while indexing, for the CLI progress bar.
#[derive(Debug, Clone)]
pub enum IndexProgress {
    Document {
        current: usize,
        total: usize,
        name: String,
    },
    Chunks {
        added: usize,
    },
}

pub type ProgressCallback = Box<dyn Fn(IndexProgress) + Send + Sync>;

/// Builds a collection from source files: read, chunk, embed, upsert.
///
/// Any failure (unreadable file, embedder error, store write) aborts the
/// build; records already upserted stay in the collection.
pub struct IndexService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    progress_callback: Option<ProgressCallback>,
}

impl IndexService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding,
            vector_store,
            progress_callback: None,
        }
    }

    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    fn emit_progress(&self, event: IndexProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn build_index(
        &self,
        files: &[PathBuf],
        params: IndexParams,
    ) -> Result<IndexStats, DomainError> {
        if files.is_empty() {
            return Err(DomainError::validation(
                "no input text files provided for index creation",
            ));
        }

        let mut stats = IndexStats::default();
        let total = files.len();

        for (i, path) in files.iter().enumerate() {
            let document = Document::from_path(path)?;
            self.emit_progress(IndexProgress::Document {
                current: i + 1,
                total,
                name: document.name.clone(),
            });

            let text = std::fs::read_to_string(&document.path).map_err(|e| {
                DomainError::validation(format!("cannot read '{}': {e}", document.path.display()))
            })?;

            let chunks = chunk_document(
                &document.name,
                &text,
                params.chunk_size,
                params.chunk_overlap,
            )?;
            if chunks.is_empty() {
                info!(document = %document.name, "document produced no chunks, skipping");
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
            let embeddings = self.embedding.embed_batch(&texts).await?;
            if embeddings.len() != chunks.len() {
                return Err(DomainError::external(format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                )));
            }

            let entries: Vec<_> = chunks.into_iter().zip(embeddings).collect();
            self.vector_store.upsert(&entries).await?;

            self.emit_progress(IndexProgress::Chunks {
                added: entries.len(),
            });
            stats.documents_indexed += 1;
            stats.chunks_indexed += entries.len();
        }

        info!(
            documents = stats.documents_indexed,
            chunks = stats.chunks_indexed,
            "index build complete"
        );
        Ok(stats)
    }
}
