//! Append-only usage metrics (spec §3 `UsageMetric`).

use crate::tenant::{DocumentId, TenantId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageMetricType {
    ApiCall,
    EmbeddingTokens,
    StorageBytes,
    DocumentProcessed,
    SearchQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetric {
    pub tenant_id: TenantId,
    pub document_id: Option<DocumentId>,
    pub metric_type: UsageMetricType,
    pub value: f64,
    pub cost_usd: f64,
    pub metadata: serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl UsageMetric {
    #[must_use]
    pub fn new(tenant_id: TenantId, metric_type: UsageMetricType, value: f64) -> Self {
        Self {
            tenant_id,
            document_id: None,
            metric_type,
            value,
            cost_usd: 0.0,
            metadata: serde_json::Value::Null,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn with_document(mut self, document_id: DocumentId) -> Self {
        self.document_id = Some(document_id);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.metadata = serde_json::json!({ "error": error });
        self
    }
}
