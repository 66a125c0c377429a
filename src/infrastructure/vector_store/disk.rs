//! Disk-persisted vector collections.
//!
//! A persist directory holds one JSON file per collection. The layout is an
//! implementation detail; callers only rely on "directory exists" and
//! "collection named X exists". Records are rewritten whole on each upsert
//! batch, and an `RwLock` serializes writers against readers.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    id: uuid::Uuid,
    source: String,
    chunk_index: usize,
    content: String,
    vector: Vec<f32>,
}

impl StoredRecord {
    fn from_entry(chunk: &DocumentChunk, embedding: &Embedding) -> Self {
        Self {
            id: chunk.id,
            source: chunk.source.clone(),
            chunk_index: chunk.chunk_index,
            content: chunk.content.clone(),
            vector: embedding.as_slice().to_vec(),
        }
    }

    fn chunk(&self) -> DocumentChunk {
        DocumentChunk {
            id: self.id,
            source: self.source.clone(),
            content: self.content.clone(),
            chunk_index: self.chunk_index,
        }
    }
}

/// Client addressing collections under one persist directory.
pub struct DiskVectorClient {
    root: PathBuf,
}

impl DiskVectorClient {
    /// Opens the persist directory, creating it when missing.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, DomainError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| {
            DomainError::internal(format!(
                "cannot create persist dir '{}': {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    /// Opens an existing persist directory; `NotFound` when it is missing.
    pub fn open_existing(root: impl AsRef<Path>) -> Result<Self, DomainError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(DomainError::not_found(format!(
                "index directory not found at '{}'. Build the index first.",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Names of all collections in the persist directory, sorted.
    pub fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            DomainError::internal(format!(
                "cannot read persist dir '{}': {e}",
                self.root.display()
            ))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();

        Ok(names)
    }

    /// Deletes a collection. Missing collections are not an error; any
    /// other filesystem failure propagates.
    pub fn delete_collection_if_exists(&self, name: &str) -> Result<bool, DomainError> {
        match std::fs::remove_file(self.collection_path(name)) {
            Ok(()) => {
                debug!(collection = name, "deleted collection");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::internal(format!(
                "cannot delete collection '{name}': {e}"
            ))),
        }
    }

    /// Opens an existing collection; `NotFound` listing the available
    /// collection names when it is absent.
    pub fn collection(&self, name: &str) -> Result<DiskCollection, DomainError> {
        let path = self.collection_path(name);
        if !path.is_file() {
            let available = self.list_collections()?;
            return Err(if available.is_empty() {
                DomainError::not_found(format!(
                    "no collections found at '{}'",
                    self.root.display()
                ))
            } else {
                DomainError::not_found(format!(
                    "collection '{name}' not found. Available collections: {}",
                    available.join(", ")
                ))
            });
        }

        DiskCollection::load(path)
    }

    /// Opens a collection, creating an empty one when it does not exist.
    pub fn create_collection(&self, name: &str) -> Result<DiskCollection, DomainError> {
        let path = self.collection_path(name);
        if path.is_file() {
            DiskCollection::load(path)
        } else {
            let collection = DiskCollection {
                path,
                records: RwLock::new(Vec::new()),
            };
            collection.persist(&[])?;
            Ok(collection)
        }
    }
}

/// One open disk-backed collection.
#[derive(Debug)]
pub struct DiskCollection {
    path: PathBuf,
    records: RwLock<Vec<StoredRecord>>,
}

impl DiskCollection {
    fn load(path: PathBuf) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DomainError::internal(format!("cannot read collection '{}': {e}", path.display()))
        })?;
        let records: Vec<StoredRecord> = serde_json::from_str(&content).map_err(|e| {
            DomainError::internal(format!(
                "corrupt collection file '{}': {e}",
                path.display()
            ))
        })?;

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn persist(&self, records: &[StoredRecord]) -> Result<(), DomainError> {
        let content = serde_json::to_string(records)
            .map_err(|e| DomainError::internal(format!("cannot serialize collection: {e}")))?;
        std::fs::write(&self.path, content).map_err(|e| {
            DomainError::internal(format!(
                "cannot write collection '{}': {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl VectorStore for DiskCollection {
    async fn upsert(&self, entries: &[(DocumentChunk, Embedding)]) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        for (chunk, embedding) in entries {
            records.retain(|existing| existing.id != chunk.id);
            records.push(StoredRecord::from_entry(chunk, embedding));
        }

        self.persist(&records)
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
            .map(|record| SearchResult {
                chunk: record.chunk(),
                score: query.cosine_similarity(&Embedding::new(record.vector.clone())),
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
