use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};

/// Local ONNX embedding adapter. The model runs in-process; calls block the
/// task until inference finishes, which matches the one-request-at-a-time
/// resource model of the application.
pub struct FastEmbedder {
    model: TextEmbedding,
    dimension: usize,
}

impl FastEmbedder {
    /// Accepts both bare model names and HuggingFace-style
    /// `org/model` identifiers.
    pub fn new(model_name: &str) -> Result<Self, DomainError> {
        let bare_name = model_name.rsplit('/').next().unwrap_or(model_name);
        let (model, dimension) = match bare_name {
            // Multilingual models (the corpus is Persian; default first)
            "paraphrase-multilingual-MiniLM-L12-v2" => {
                (EmbeddingModel::ParaphraseMLMiniLML12V2, 384)
            }
            "multilingual-e5-small" => (EmbeddingModel::MultilingualE5Small, 384),
            "multilingual-e5-base" => (EmbeddingModel::MultilingualE5Base, 768),
            "multilingual-e5-large" => (EmbeddingModel::MultilingualE5Large, 1024),
            // English-only, kept for experiments
            "all-MiniLM-L6-v2" => (EmbeddingModel::AllMiniLML6V2, 384),
            "bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
            other => {
                return Err(DomainError::validation(format!(
                    "unknown embedding model: {other}. Supported: \
                     paraphrase-multilingual-MiniLM-L12-v2, multilingual-e5-small, \
                     multilingual-e5-base, multilingual-e5-large, all-MiniLM-L6-v2, \
                     bge-small-en-v1.5"
                )));
            }
        };

        let model =
            TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(true))
                .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(Self { model, dimension })
    }
}

#[async_trait]
impl EmbeddingService for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::external("embedding backend returned no vector"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(vectors.into_iter().map(Embedding::new).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_is_rejected() {
        let result = FastEmbedder::new("definitely-not-a-model");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
