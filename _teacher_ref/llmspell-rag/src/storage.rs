//! Vector storage implementations

pub mod dimension_router;
pub mod hnsw;
pub mod metadata_index;

pub use dimension_router::{DimensionInfo, DimensionRouter};
pub use hnsw::HNSWVectorStorage;
pub use metadata_index::{IndexType, MetadataIndex, MetadataQueryOptimizer, QueryStats};
