//! Paragraph-aware chunking and batched embedding with cost accounting.

pub mod chunk;
pub mod embedder;
pub mod reranker;

pub use chunk::{chunk_text, Chunk, ChunkParams};
pub use embedder::{
    estimate_cost_usd, estimate_tokens, EmbedBatchResult, Embedder, EmbeddingModel, HttpEmbedder,
};
pub use reranker::{IdentityReranker, RerankCandidate, Reranker, RerankedResult};
