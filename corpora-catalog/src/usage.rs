//! Append-only usage metric writes (spec §3 `UsageMetric`, §4.9).
//!
//! Usage metrics are written after the response completes; any write failure
//! is logged and swallowed by the caller (spec §4.9), never surfaced to the
//! client.

use crate::error::{map_pg_error, map_pool_error};
use corpora_core::{TenantId, UsageMetric, UsageMetricType};
use deadpool_postgres::Pool;

#[derive(Clone)]
pub struct UsageRepo {
    pool: Pool,
}

fn metric_type_str(t: UsageMetricType) -> &'static str {
    match t {
        UsageMetricType::ApiCall => "api_call",
        UsageMetricType::EmbeddingTokens => "embedding_tokens",
        UsageMetricType::StorageBytes => "storage_bytes",
        UsageMetricType::DocumentProcessed => "document_processed",
        UsageMetricType::SearchQuery => "search_query",
    }
}

impl UsageRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, metric: &UsageMetric) -> Result<(), corpora_core::CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "INSERT INTO usage_metrics
                    (customer_id, document_id, metric_type, value, cost_usd, metadata)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &metric.tenant_id.0,
                    &metric.document_id.map(|d| d.0),
                    &metric_type_str(metric.metric_type),
                    &metric.value,
                    &metric.cost_usd,
                    &metric.metadata,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    pub async fn summary(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<(String, f64, f64)>, corpora_core::CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let rows = client
            .query(
                "SELECT metric_type, sum(value), sum(cost_usd) FROM usage_metrics
                 WHERE customer_id = $1 GROUP BY metric_type",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(rows
            .iter()
            .map(|r| (r.get(0), r.get(1), r.get(2)))
            .collect())
    }
}
