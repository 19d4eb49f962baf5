//! Knowledge graph types
//!
//! Domain types for KnowledgeGraph trait including:
//! - Entity: Graph node with bi-temporal tracking
//! - Relationship: Graph edge with temporal validity
//! - TemporalQuery: Query with time range constraints
//!
//! Migration pending - Day 3 of Task 13c.3.0

// Placeholder for Day 3 migration
#[allow(dead_code)]
pub struct PlaceholderEntity;
