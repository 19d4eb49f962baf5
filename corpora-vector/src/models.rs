use corpora_core::{CoreError, DocumentId};
use serde::{Deserialize, Serialize};

/// Embedding dimensionality. Each variant maps to its own physical table —
/// there is no cross-dimension search, and a chunk always lands in the table
/// matching its vector's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    D1536,
    D3072,
}

impl Dimension {
    pub fn from_len(len: usize) -> Result<Self, CoreError> {
        match len {
            1536 => Ok(Dimension::D1536),
            3072 => Ok(Dimension::D3072),
            other => Err(CoreError::validation(format!(
                "unsupported embedding dimension: {other}"
            ))),
        }
    }

    pub(crate) fn table(self) -> &'static str {
        match self {
            Dimension::D1536 => "document_chunks",
            Dimension::D3072 => "document_chunks_3072",
        }
    }
}

/// A chunk to be written, paired with its already-computed embedding.
#[derive(Debug, Clone)]
pub struct ChunkInput {
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Vec<f32>,
    pub start_char: i32,
    pub end_char: i32,
    pub title: Option<String>,
}

/// A chunk returned by range lookup, without its embedding — range reads
/// never need the vector and skip the ANN index entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRow {
    pub document_id: DocumentId,
    pub chunk_index: i32,
    pub content: String,
    pub start_char: i32,
    pub end_char: i32,
    pub title: Option<String>,
}

/// A chunk returned by similarity search, with its cosine score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub document_id: DocumentId,
    pub chunk_index: i32,
    pub content: String,
    pub title: Option<String>,
    pub score: f32,
}
