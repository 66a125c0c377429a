pub mod config;
pub mod data;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use config::AppConfig;
pub use embedding::FastEmbedder;
pub use llm::OpenRouterClient;
pub use vector_store::{DiskCollection, DiskVectorClient, InMemoryVectorStore};
