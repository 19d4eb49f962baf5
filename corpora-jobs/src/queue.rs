use crate::job::{Job, QueueOptions};
use corpora_core::Metrics;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// Durable FIFO queue, in-process. Enqueue is idempotent by job id: a
/// duplicate enqueue while the job is queued or running is a no-op.
pub struct JobQueue {
    pending: Mutex<VecDeque<String>>,
    jobs: DashMap<String, Job>,
    in_flight: DashSet<String>,
    cancelled: DashSet<String>,
    completed: Mutex<VecDeque<String>>,
    failed: Mutex<VecDeque<String>>,
    notify: Notify,
    pub(crate) options: QueueOptions,
    metrics: Arc<Metrics>,
}

impl JobQueue {
    #[must_use]
    pub fn new(options: QueueOptions, metrics: Arc<Metrics>) -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(VecDeque::new()),
            jobs: DashMap::new(),
            in_flight: DashSet::new(),
            cancelled: DashSet::new(),
            completed: Mutex::new(VecDeque::new()),
            failed: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            options,
            metrics,
        })
    }

    /// Returns `true` if this call actually enqueued a new job, `false` if
    /// an existing job with this id collapsed the duplicate.
    pub fn enqueue(&self, job: Job) -> bool {
        if self.jobs.contains_key(&job.id) {
            return false;
        }
        self.cancelled.remove(&job.id);
        let id = job.id.clone();
        self.jobs.insert(id.clone(), job);
        self.pending.lock().push_back(id);
        self.notify.notify_one();
        self.metrics.inc_jobs_enqueued();
        true
    }

    /// Remove a job by id. If it's already running, this only prevents a
    /// future retry — the in-flight attempt finishes naturally.
    pub fn cancel(&self, job_id: &str) -> bool {
        self.cancelled.insert(job_id.to_string());
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|id| id != job_id);
        if pending.len() != before {
            self.jobs.remove(job_id);
            true
        } else {
            self.in_flight.contains(job_id)
        }
    }

    pub(crate) fn is_cancelled(&self, job_id: &str) -> bool {
        self.cancelled.contains(job_id)
    }

    /// Pop the next runnable job, skipping ids cancelled while queued.
    pub(crate) fn dequeue(&self) -> Option<Job> {
        loop {
            let id = self.pending.lock().pop_front()?;
            if self.cancelled.remove(&id).is_some() {
                self.jobs.remove(&id);
                continue;
            }
            self.in_flight.insert(id.clone());
            return self.jobs.get(&id).map(|r| r.clone());
        }
    }

    pub(crate) fn requeue(&self, job: Job) {
        self.in_flight.remove(&job.id);
        let id = job.id.clone();
        self.jobs.insert(id.clone(), job);
        self.pending.lock().push_back(id);
        self.notify.notify_one();
    }

    pub(crate) fn finish(&self, job_id: &str, succeeded: bool) {
        self.in_flight.remove(job_id);
        self.jobs.remove(job_id);
        let (list, cap) = if succeeded {
            self.metrics.inc_jobs_completed();
            (&self.completed, self.options.keep_completed)
        } else {
            self.metrics.inc_jobs_failed();
            (&self.failed, self.options.keep_failed)
        };
        let mut list = list.lock();
        list.push_back(job_id.to_string());
        while list.len() > cap {
            list.pop_front();
        }
    }

    pub(crate) async fn wait_for_work(&self) {
        self.notify.notified().await;
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Proxy for "active worker count" (SPEC_FULL §B): each in-flight job
    /// occupies exactly one worker slot.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn completed_ids(&self) -> Vec<String> {
        self.completed.lock().iter().cloned().collect()
    }

    pub fn failed_ids(&self) -> Vec<String> {
        self.failed.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobKind;

    fn job(id: &str) -> Job {
        Job::new(id, JobKind::ProcessDocument, serde_json::json!({}))
    }

    #[test]
    fn duplicate_enqueue_collapses() {
        let queue = JobQueue::new(QueueOptions::default(), corpora_core::Metrics::new());
        assert!(queue.enqueue(job("a")));
        assert!(!queue.enqueue(job("a")));
        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn dequeue_is_fifo() {
        let queue = JobQueue::new(QueueOptions::default(), corpora_core::Metrics::new());
        queue.enqueue(job("a"));
        queue.enqueue(job("b"));
        assert_eq!(queue.dequeue().unwrap().id, "a");
        assert_eq!(queue.dequeue().unwrap().id, "b");
    }

    #[test]
    fn cancel_while_queued_removes_it() {
        let queue = JobQueue::new(QueueOptions::default(), corpora_core::Metrics::new());
        queue.enqueue(job("a"));
        assert!(queue.cancel("a"));
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn finish_trims_retention() {
        let mut opts = QueueOptions::default();
        opts.keep_completed = 2;
        let queue = JobQueue::new(opts, corpora_core::Metrics::new());
        queue.finish("a", true);
        queue.finish("b", true);
        queue.finish("c", true);
        assert_eq!(queue.completed_ids(), vec!["b".to_string(), "c".to_string()]);
    }
}
