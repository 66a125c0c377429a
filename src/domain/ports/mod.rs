mod embedding;
mod llm;
mod vector_store;

pub use embedding::EmbeddingService;
pub use llm::{CompletionOptions, LlmService};
pub use vector_store::VectorStore;
