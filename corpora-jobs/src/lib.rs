//! Durable, idempotent FIFO job queue and a bounded, rate-limited worker
//! pool. Enqueue is keyed by job id so a duplicate submission (the caller
//! retrying an upload, say) never creates a second job.

pub mod bucket;
pub mod job;
pub mod queue;
pub mod worker;

pub use job::{backoff_for_attempt, Job, JobKind, JobOutcome, QueueOptions};
pub use queue::JobQueue;
pub use worker::{JobHandler, WorkerPool};
