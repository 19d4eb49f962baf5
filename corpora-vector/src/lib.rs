//! Tenant-scoped vector storage: per-dimension physical tables, ANN
//! similarity search, contiguous chunk range reads, and cascading deletes.
//! Every query is scoped by `customer_id` — there is no cross-tenant read
//! path, and no operation mixes rows from the 1536- and 3072-dimension
//! tables.

pub mod error;
pub mod index;
pub mod models;
pub mod pool;

pub use index::{PgVectorIndex, VectorIndex};
pub use models::{ChunkInput, ChunkRow, Dimension, ScoredChunk};
pub use pool::{build_pool, run_migrations, VectorStoreConfig};
