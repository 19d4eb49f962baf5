use crate::bucket::TokenBucket;
use crate::job::{backoff_for_attempt, Job, JobOutcome};
use crate::queue::JobQueue;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> JobOutcome;
}

/// Bounded pool of worker tasks pulling from one [`JobQueue`]. Each worker
/// throttles against a shared per-second token bucket before picking up its
/// next job, so overall throughput is capped regardless of concurrency.
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn<H: JobHandler + 'static>(queue: Arc<JobQueue>, handler: Arc<H>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let bucket = Arc::new(Mutex::new(TokenBucket::new(queue.options.rate_per_second)));
        let mut handles = Vec::with_capacity(queue.options.concurrency);

        for worker_id in 0..queue.options.concurrency {
            let queue = queue.clone();
            let handler = handler.clone();
            let bucket = bucket.clone();
            let mut shutdown_rx = shutdown_rx.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                    let Some(job) = queue.dequeue() else {
                        tokio::select! {
                            _ = queue.wait_for_work() => continue,
                            _ = shutdown_rx.changed() => break,
                        }
                    };
                    throttle(&bucket).await;
                    run_one(&queue, &*handler, job, worker_id).await;
                }
            }));
        }

        Self {
            shutdown_tx,
            handles,
        }
    }

    /// Stop pulling new jobs; in-flight attempts are allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

async fn throttle(bucket: &Mutex<TokenBucket>) {
    loop {
        let wait = {
            let mut bucket = bucket.lock();
            bucket.try_acquire()
        };
        match wait {
            Ok(()) => return,
            Err(duration) => tokio::time::sleep(duration).await,
        }
    }
}

async fn run_one(queue: &JobQueue, handler: &dyn JobHandler, mut job: Job, worker_id: usize) {
    job.attempts += 1;
    let outcome = handler.handle(&job).await;
    match outcome {
        JobOutcome::Completed => {
            info!(job_id = %job.id, worker_id, "job completed");
            queue.finish(&job.id, true);
        }
        JobOutcome::FatalFailure => {
            warn!(job_id = %job.id, worker_id, "job failed fatally");
            queue.finish(&job.id, false);
        }
        JobOutcome::RetryableFailure => {
            if job.attempts >= queue.options.max_attempts || queue.is_cancelled(&job.id) {
                warn!(job_id = %job.id, attempts = job.attempts, "job exhausted retries");
                queue.finish(&job.id, false);
            } else {
                let delay = backoff_for_attempt(queue.options.initial_backoff, job.attempts);
                warn!(job_id = %job.id, attempts = job.attempts, ?delay, "retrying job");
                tokio::time::sleep(delay).await;
                queue.requeue(job);
            }
        }
    }
}
