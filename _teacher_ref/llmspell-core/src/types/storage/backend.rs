//! Storage backend types
//!
//! Domain types for StorageBackend trait including:
//! - StorageBackendType: Backend identifier enum
//! - StorageCharacteristics: Capability flags
//!
//! Migration pending - Day 3 of Task 13c.3.0

// Placeholder for Day 3 migration
#[allow(dead_code)]
pub struct PlaceholderBackendType;
