//! Progress/completion event bus (spec §4.7: "observers may subscribe to
//! progress, completion, and failure events").
//!
//! Broadcast rather than point-to-point: the API layer's SSE/WS handlers and
//! any future observer can each hold their own receiver without coordinating
//! with the worker that emits events.

use corpora_core::{DocumentId, JobProgress, TenantId};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Progress {
        tenant_id: TenantId,
        document_id: DocumentId,
        progress: JobProgress,
    },
    Completed {
        tenant_id: TenantId,
        document_id: DocumentId,
    },
    Failed {
        tenant_id: TenantId,
        document_id: DocumentId,
        message: String,
    },
}

pub struct ProgressBus {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    /// Dropped silently if nobody is subscribed — this is a notification
    /// channel, not a durable log.
    pub fn emit(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new()
    }
}
