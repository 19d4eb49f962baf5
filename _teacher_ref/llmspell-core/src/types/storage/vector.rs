//! Vector storage types
//!
//! Domain types for VectorStorage trait including:
//! - VectorEntry: Embedding with metadata
//! - VectorQuery: Query parameters
//! - VectorResult: Search result with score
//! - DistanceMetric: Cosine/Euclidean/DotProduct
//! - ScoringMethod: Vector/BM25/Hybrid
//!
//! Migration pending - Day 3 of Task 13c.3.0

// Placeholder for Day 3 migration
#[allow(dead_code)]
pub struct PlaceholderVectorEntry;
