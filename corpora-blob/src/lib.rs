//! Content-addressed blob storage for uploaded source documents. Objects are
//! stored under a tenant- and document-scoped key so a leaked key from one
//! tenant can never resolve into another tenant's prefix.

pub mod error;
pub mod key;
pub mod memory;
pub mod store;

pub use key::{blob_key, content_hash, sanitize_filename};
pub use memory::InMemoryBlobStore;
pub use store::{BlobMeta, BlobStore, S3BlobStore};
