//! In-process counters exposed via a `/metrics`-style snapshot (SPEC_FULL
//! §B) rather than wired to an external collector. Every counter is a
//! relaxed atomic: these numbers are for human operators glancing at a
//! dashboard, not billing or correctness decisions.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bounds (milliseconds) for the vector search latency histogram.
/// One implicit final bucket above the last bound catches everything else.
const SEARCH_LATENCY_BOUNDS_MS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
];

pub struct Metrics {
    jobs_enqueued: AtomicU64,
    jobs_completed: AtomicU64,
    jobs_failed: AtomicU64,
    rate_limit_rejections: AtomicU64,
    search_latency_buckets: Vec<AtomicU64>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            jobs_enqueued: AtomicU64::new(0),
            jobs_completed: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
            rate_limit_rejections: AtomicU64::new(0),
            search_latency_buckets: (0..=SEARCH_LATENCY_BOUNDS_MS.len())
                .map(|_| AtomicU64::new(0))
                .collect(),
        })
    }

    pub fn inc_jobs_enqueued(&self) {
        self.jobs_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_jobs_completed(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_jobs_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limit_rejections(&self) {
        self.rate_limit_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_search_latency(&self, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        let idx = SEARCH_LATENCY_BOUNDS_MS
            .iter()
            .position(|bound| ms <= *bound)
            .unwrap_or(SEARCH_LATENCY_BOUNDS_MS.len());
        self.search_latency_buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self, active_workers: usize) -> MetricsSnapshot {
        let mut search_latency_ms_buckets = Vec::with_capacity(self.search_latency_buckets.len());
        for (bound, counter) in SEARCH_LATENCY_BOUNDS_MS
            .iter()
            .zip(self.search_latency_buckets.iter())
        {
            search_latency_ms_buckets.push((bound.to_string(), counter.load(Ordering::Relaxed)));
        }
        search_latency_ms_buckets.push((
            "+Inf".to_string(),
            self.search_latency_buckets[SEARCH_LATENCY_BOUNDS_MS.len()].load(Ordering::Relaxed),
        ));

        MetricsSnapshot {
            jobs_enqueued: self.jobs_enqueued.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            active_workers,
            rate_limit_rejections: self.rate_limit_rejections.load(Ordering::Relaxed),
            search_latency_ms_buckets,
        }
    }
}

/// Cumulative point-in-time view returned by `GET /metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub jobs_enqueued: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
    pub active_workers: usize,
    pub rate_limit_rejections: u64,
    pub search_latency_ms_buckets: Vec<(String, u64)>,
}
