//! Everything a request handler needs, built once at startup and shared
//! behind an `Arc` (spec §5: "no shared mutable state between requests
//! except the catalog, vector index, queue, and blob store").

use crate::mcp::session::McpSessions;
use corpora_auth::AuthService;
use corpora_blob::BlobStore;
use corpora_catalog::{DocumentRepo, Tenant, TenantRepo};
use corpora_core::{CoreError, Metrics};
use corpora_orchestrator::{IngestionOrchestrator, ProgressBus};
use corpora_ratelimit::{RateLimiter, UsageTracker};
use corpora_rag::{Embedder, HttpEmbedder, Reranker};
use std::sync::Arc;

pub struct AppState {
    pub auth: Arc<AuthService>,
    pub rate_limiter: RateLimiter,
    pub usage: UsageTracker,
    pub tenants: TenantRepo,
    pub documents: DocumentRepo,
    pub blob: Arc<dyn BlobStore>,
    pub vector: Arc<dyn corpora_vector::VectorIndex>,
    pub orchestrator: Arc<IngestionOrchestrator>,
    pub progress: Arc<ProgressBus>,
    pub platform_embedder: Arc<dyn Embedder>,
    pub embedder_base_url: String,
    pub reranker: Arc<dyn Reranker>,
    pub mcp_sessions: Arc<McpSessions>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// A tenant with its own embedder key (spec §4.11 "fall back to the
    /// platform key if absent") gets an embedder built from it; everyone
    /// else uses the shared platform embedder. Used by both the REST
    /// search endpoint and the `search_documents` MCP tool so a tenant's
    /// own usage is billed against its own key consistently.
    pub async fn embedder_for(&self, tenant: &Tenant) -> Result<Arc<dyn Embedder>, CoreError> {
        match self.auth.embedder_key(tenant).await? {
            Some(key) => Ok(Arc::new(HttpEmbedder::new(self.embedder_base_url.clone(), key))),
            None => Ok(self.platform_embedder.clone()),
        }
    }
}
