//! Ingestion pipeline (C11): ties blob storage, parsing, chunking, the
//! embedder, and the vector index into the document lifecycle described by
//! spec §4.11 — synchronous intake on the request path, asynchronous
//! processing in the job queue's worker pool.

pub mod ingest;
pub mod payload;
pub mod progress;
pub mod worker;

pub use ingest::IngestionOrchestrator;
pub use payload::{UploadPayload, UrlPayload};
pub use progress::{ProgressBus, ProgressEvent};
pub use worker::IngestionWorker;
