mod answer;
mod indexing;
mod rag;

pub use answer::{AnswerOptions, AnswerService};
pub use indexing::{IndexParams, IndexProgress, IndexService, IndexStats};
pub use rag::RagService;
