//! Application layer - use cases and orchestration.
//!
//! Services here orchestrate domain logic over the capability ports
//! (traits) and never depend on concrete adapters.

pub mod prompt;
pub mod services;

pub use services::{AnswerOptions, AnswerService, IndexService, RagService};
