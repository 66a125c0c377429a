mod disk;
mod in_memory;

pub use disk::{DiskCollection, DiskVectorClient};
pub use in_memory::InMemoryVectorStore;
