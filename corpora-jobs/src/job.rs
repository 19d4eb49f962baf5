use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    ProcessDocument,
    ScrapeUrl,
}

/// Retry/retention policy for the whole queue. Not per-job — every job in
/// the queue shares one policy, matching a single worker pool per process.
#[derive(Debug, Clone, Copy)]
pub struct QueueOptions {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub keep_completed: usize,
    pub keep_failed: usize,
    pub concurrency: usize,
    pub rate_per_second: f64,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            keep_completed: 100,
            keep_failed: 500,
            concurrency: 5,
            rate_per_second: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub kind: JobKind,
    pub payload: serde_json::Value,
    pub attempts: u32,
}

impl Job {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: JobKind, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            kind,
            payload,
            attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    /// Retry if attempts remain, else fail permanently.
    RetryableFailure,
    /// Never retry regardless of attempts remaining.
    FatalFailure,
}

/// Backoff for the Nth (1-indexed) attempt: `initial * 2^(n-1)`.
#[must_use]
pub fn backoff_for_attempt(initial: Duration, attempt: u32) -> Duration {
    initial.saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_each_attempt() {
        let base = Duration::from_secs(2);
        assert_eq!(backoff_for_attempt(base, 1), Duration::from_secs(2));
        assert_eq!(backoff_for_attempt(base, 2), Duration::from_secs(4));
        assert_eq!(backoff_for_attempt(base, 3), Duration::from_secs(8));
    }
}
