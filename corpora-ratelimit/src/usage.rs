//! Fire-and-forget usage metric recording (spec §4.9): writes happen after
//! the response has already been sent, and a write failure is logged and
//! swallowed rather than surfaced to the client.

use corpora_catalog::UsageRepo;
use corpora_core::UsageMetric;

#[derive(Clone)]
pub struct UsageTracker {
    repo: UsageRepo,
}

impl UsageTracker {
    #[must_use]
    pub fn new(repo: UsageRepo) -> Self {
        Self { repo }
    }

    /// Spawn the write so the caller's response is never delayed by it.
    pub fn record_async(&self, metric: UsageMetric) {
        let repo = self.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.record(&metric).await {
                tracing::warn!(error = %e, tenant_id = %metric.tenant_id, "usage metric write failed");
            }
        });
    }

    pub async fn summary(
        &self,
        tenant_id: corpora_core::TenantId,
    ) -> Result<Vec<(String, f64, f64)>, corpora_core::CoreError> {
        self.repo.summary(tenant_id).await
    }
}
