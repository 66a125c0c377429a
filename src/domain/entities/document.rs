use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// A source text to be indexed, identified by its file stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub path: PathBuf,
}

impl Document {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                DomainError::validation(format!("invalid document path: {}", path.display()))
            })?
            .to_string();

        Ok(Self {
            name,
            path: path.to_path_buf(),
        })
    }
}

/// A contiguous span of one source document, the unit of embedding and
/// retrieval. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub source: String,
    pub content: String,
    pub chunk_index: usize,
}

impl DocumentChunk {
    /// The id is a UUIDv5 over (source, position, content), so re-indexing
    /// identical input upserts the same records instead of duplicating them.
    pub fn new(source: impl Into<String>, content: impl Into<String>, chunk_index: usize) -> Self {
        let source = source.into();
        let content = content.into();
        let id = Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            format!("{source}:{chunk_index}:{content}").as_bytes(),
        );

        Self {
            id,
            source,
            content,
            chunk_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

const SENTENCE_TERMINATORS: [char; 5] = ['.', '!', '?', '؟', '\n'];

/// Splits text into windows of at most `chunk_size` characters, consecutive
/// windows sharing `chunk_overlap` characters. Offsets are Unicode scalar
/// values, not bytes; the corpus is Persian.
///
/// A window ends at the last sentence terminator that still leaves the next
/// window a new starting point past the overlap; otherwise it is cut hard at
/// `chunk_size`. Whitespace-only spans are dropped.
pub fn chunk_document(
    source: &str,
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<DocumentChunk>, DomainError> {
    if chunk_size == 0 {
        return Err(DomainError::validation("chunk_size must be positive"));
    }
    if chunk_overlap >= chunk_size {
        return Err(DomainError::validation(format!(
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    // Byte offset of every char boundary, including the end of the text.
    let mut bounds: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    bounds.push(text.len());
    let total_chars = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < total_chars {
        let window_end = (start + chunk_size).min(total_chars);
        let end = if window_end < total_chars {
            split_point(text, &bounds, start, window_end, chunk_overlap)
        } else {
            window_end
        };

        let content = &text[bounds[start]..bounds[end]];
        if !content.trim().is_empty() {
            chunks.push(DocumentChunk::new(source, content, chunks.len()));
        }

        if end == total_chars {
            break;
        }
        start = end - chunk_overlap;
    }

    Ok(chunks)
}

/// Last sentence terminator inside the window whose cut still advances the
/// next window past the overlap region; the hard window end otherwise.
fn split_point(
    text: &str,
    bounds: &[usize],
    start: usize,
    window_end: usize,
    overlap: usize,
) -> usize {
    let window = &text[bounds[start]..bounds[window_end]];
    let mut cut = None;

    for (i, ch) in window.chars().enumerate() {
        let candidate = start + i + 1; // split after the terminator
        if candidate > start + overlap && SENTENCE_TERMINATORS.contains(&ch) {
            cut = Some(candidate);
        }
    }

    cut.unwrap_or(window_end)
}
