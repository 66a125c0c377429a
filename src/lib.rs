//! qpq - retrieval-augmented question answering over Persian Quranic
//! commentary texts.
//!
//! Source documents are split into overlapping chunks, embedded locally and
//! persisted into a named vector collection on disk. At query time the top-k
//! most similar chunks are retrieved and assembled into a Persian prompt for
//! an OpenRouter chat completion.

pub mod application;
pub mod domain;
pub mod infrastructure;
