use async_trait::async_trait;
use corpora_core::CoreError;
use serde::{Deserialize, Serialize};

/// Known embedding models and their output dimensionality / per-million-token
/// USD rate. Unknown model names fall back to the small-model rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingModel {
    Small,
    Ada,
    Large,
}

impl EmbeddingModel {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "text-embedding-3-large" | "large" => Self::Large,
            "text-embedding-ada-002" | "ada" => Self::Ada,
            _ => Self::Small,
        }
    }

    #[must_use]
    pub const fn dimensions(self) -> usize {
        match self {
            Self::Small | Self::Ada => 1536,
            Self::Large => 3072,
        }
    }

    #[must_use]
    pub const fn usd_per_million_tokens(self) -> f64 {
        match self {
            Self::Small => 0.02,
            Self::Ada => 0.10,
            Self::Large => 0.13,
        }
    }
}

/// `ceil(total_chars / 4)`, used when the embedder response doesn't report
/// exact token counts.
#[must_use]
pub fn estimate_tokens(total_chars: usize) -> u64 {
    ((total_chars as f64) / 4.0).ceil() as u64
}

#[must_use]
pub fn estimate_cost_usd(tokens: u64, model: EmbeddingModel) -> f64 {
    (tokens as f64 / 1_000_000.0) * model.usd_per_million_tokens()
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    pub model: String,
    pub input: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedResponseItem {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedResponseItem>,
    usage: Option<EmbedUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedUsage {
    total_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct EmbedBatchResult {
    pub vectors: Vec<Vec<f32>>,
    pub tokens_used: u64,
    pub cost_usd: f64,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed every chunk of a document in one call (or the provider's max
    /// batch, chunked internally).
    async fn embed_batch(
        &self,
        texts: &[String],
        model: EmbeddingModel,
    ) -> Result<EmbedBatchResult, CoreError>;
}

/// Caps how many inputs are sent per upstream call; batches larger than
/// this are split and the costs summed.
const MAX_BATCH: usize = 256;

pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEmbedder {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed_batch(
        &self,
        texts: &[String],
        model: EmbeddingModel,
    ) -> Result<EmbedBatchResult, CoreError> {
        let mut vectors = Vec::with_capacity(texts.len());
        let mut tokens_used = 0u64;
        let model_name = match model {
            EmbeddingModel::Small => "text-embedding-3-small",
            EmbeddingModel::Ada => "text-embedding-ada-002",
            EmbeddingModel::Large => "text-embedding-3-large",
        };

        for batch in texts.chunks(MAX_BATCH) {
            let request = EmbedRequest {
                model: model_name.to_string(),
                input: batch.to_vec(),
            };
            let response = self
                .client
                .post(format!("{}/embeddings", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| CoreError::Embedder {
                    message: format!("embedder request failed: {e}"),
                    retryable: true,
                })?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(CoreError::Embedder {
                    message: "embedder rejected the configured API key".to_string(),
                    retryable: false,
                });
            }
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(CoreError::Embedder {
                    message: "embedder rejected the request (bad input)".to_string(),
                    retryable: false,
                });
            }
            if !status.is_success() {
                return Err(CoreError::Embedder {
                    message: format!("embedder returned status {status}"),
                    retryable: true,
                });
            }

            let body: EmbedResponse = response.json().await.map_err(|e| CoreError::Embedder {
                message: format!("embedder returned an unparseable response: {e}"),
                retryable: true,
            })?;

            let chars: usize = batch.iter().map(String::len).sum();
            tokens_used += body
                .usage
                .map(|u| u.total_tokens)
                .unwrap_or_else(|| estimate_tokens(chars));
            vectors.extend(body.data.into_iter().map(|d| d.embedding));
        }

        let cost_usd = estimate_cost_usd(tokens_used, model);
        Ok(EmbedBatchResult {
            vectors,
            tokens_used,
            cost_usd,
        })
    }
}
