//! Local embedding provider placeholder implementation
//!
//! This is a placeholder for future BGE-M3 and other local model integrations
//! using candle or ONNX runtime. Currently provides mock embeddings for testing.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::provider::EmbeddingModel;

/// Local embedding model placeholder
///
/// TODO: In future phases, integrate with:
/// - candle for BGE-M3, E5 models
/// - ONNX runtime for `FastEmbed` models
/// - llama.cpp for BERT-based models
#[derive(Debug)]
pub struct LocalEmbedding {
    /// Model identifier
    model_id: String,

    /// Number of dimensions
    dimensions: usize,

    /// Whether to use deterministic mock embeddings (for testing)
    deterministic: bool,
}

impl LocalEmbedding {
    /// Create new local embedding model
    pub fn new(model_id: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimensions,
            deterministic: false,
        }
    }

    /// Create BGE-M3 placeholder
    #[must_use]
    pub fn bge_m3() -> Self {
        Self::new("BAAI/bge-m3", 1024)
    }

    /// Create E5-large placeholder
    #[must_use]
    pub fn e5_large() -> Self {
        Self::new("intfloat/e5-large-v2", 1024)
    }

    /// Create multilingual E5 placeholder
    #[must_use]
    pub fn multilingual_e5() -> Self {
        Self::new("intfloat/multilingual-e5-large", 1024)
    }

    /// Enable deterministic mock embeddings for testing
    #[must_use]
    pub const fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Generate mock embedding vector
    ///
    /// Creates a pseudo-random but deterministic (if enabled) vector
    /// based on the input text hash.
    #[allow(clippy::cast_precision_loss)]
    fn generate_mock_embedding(&self, text: &str) -> Vec<f32> {
        if self.deterministic {
            // Generate deterministic embeddings based on text hash
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            let seed = hasher.finish();

            // Use hash to generate consistent values
            let mut embedding = Vec::with_capacity(self.dimensions);
            for i in 0..self.dimensions {
                // Generate value between -1 and 1 based on hash and position
                let value = (((seed.wrapping_mul(i as u64 + 1)) % 2000) as f32 / 1000.0) - 1.0;
                embedding.push(value);
            }

            // Normalize to unit vector
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut embedding {
                    *v /= norm;
                }
            }

            embedding
        } else {
            // Generate random embeddings for non-deterministic mode
            let mut rng = rand::thread_rng();
            let mut embedding: Vec<f32> = (0..self.dimensions)
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect();

            // Normalize to unit vector
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut embedding {
                    *v /= norm;
                }
            }

            embedding
        }
    }
}

#[async_trait]
impl EmbeddingModel for LocalEmbedding {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Simulate some processing time
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        // Generate mock embeddings
        let embeddings = texts
            .iter()
            .map(|text| self.generate_mock_embedding(text))
            .collect();

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn supports_dimension_reduction(&self) -> bool {
        // BGE-M3 supports Matryoshka representations
        self.model_id.contains("bge-m3")
    }

    fn set_dimensions(&mut self, dims: usize) -> Result<()> {
        if !self.supports_dimension_reduction() {
            anyhow::bail!(
                "Model {} does not support dimension configuration",
                self.model_id
            );
        }

        // BGE-M3 supports dimensions: 256, 512, 768, 1024
        let valid_dims = [256, 512, 768, 1024];
        if !valid_dims.contains(&dims) {
            anyhow::bail!(
                "Invalid dimensions {} for model {} (valid: {:?})",
                dims,
                self.model_id,
                valid_dims
            );
        }

        self.dimensions = dims;
        Ok(())
    }

    fn cost_per_token(&self) -> Option<f64> {
        // Local models have no API costs
        Some(0.0)
    }
}

/// Future: Candle-based BGE-M3 implementation
///
/// ```ignore
/// pub struct CandleBGEM3 {
///     model: candle::Model,
///     tokenizer: tokenizers::Tokenizer,
///     config: BGEConfig,
/// }
/// ```
/// Future: ONNX-based `FastEmbed` implementation
///
/// ```ignore
/// pub struct `ONNXFastEmbed` {
///     session: ort::Session,
///     tokenizer: tokenizers::Tokenizer,
///     model_id: String,
/// }
/// ```
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_embedding_generation() {
        let model = LocalEmbedding::bge_m3().with_deterministic(true);

        let texts = vec!["Hello world".to_string(), "Testing embeddings".to_string()];

        let embeddings = model.embed(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 1024);
        assert_eq!(embeddings[1].len(), 1024);

        // Verify normalization (unit vectors)
        for embedding in &embeddings {
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!(
                (norm - 1.0).abs() < 0.001,
                "Embedding not normalized: {norm}"
            );
        }

        // Verify deterministic generation
        let embeddings2 = model.embed(&texts).await.unwrap();
        assert_eq!(embeddings[0], embeddings2[0]);
        assert_eq!(embeddings[1], embeddings2[1]);
    }

    #[tokio::test]
    async fn test_random_embeddings() {
        let model = LocalEmbedding::e5_large().with_deterministic(false);

        let texts = vec!["Test".to_string()];

        let embeddings1 = model.embed(&texts).await.unwrap();
        let embeddings2 = model.embed(&texts).await.unwrap();

        // Random embeddings should be different
        assert_ne!(embeddings1[0], embeddings2[0]);
    }

    #[test]
    fn test_dimension_configuration() {
        let mut model = LocalEmbedding::bge_m3();

        // BGE-M3 supports dimension reduction
        assert!(model.supports_dimension_reduction());

        // Valid dimensions
        assert!(model.set_dimensions(512).is_ok());
        assert_eq!(model.dimensions(), 512);

        // Invalid dimensions
        assert!(model.set_dimensions(400).is_err());
        assert!(model.set_dimensions(2048).is_err());
    }

    #[test]
    fn test_e5_no_dimension_support() {
        let mut model = LocalEmbedding::e5_large();
        assert!(!model.supports_dimension_reduction());
        assert!(model.set_dimensions(512).is_err());
    }

    #[tokio::test]
    async fn test_consistent_hash_based_embeddings() {
        let model = LocalEmbedding::bge_m3().with_deterministic(true);

        // Same text should always produce same embedding
        let text = vec!["Consistent text".to_string()];
        let emb1 = model.embed(&text).await.unwrap();
        let emb2 = model.embed(&text).await.unwrap();

        assert_eq!(emb1[0], emb2[0]);

        // Different text should produce different embeddings
        let text2 = vec!["Different text".to_string()];
        let emb3 = model.embed(&text2).await.unwrap();

        assert_ne!(emb1[0], emb3[0]);
    }
}
