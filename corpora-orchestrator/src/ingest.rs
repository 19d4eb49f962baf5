//! Ingestion entry points (spec §4.11 "Synchronous intake"): validate,
//! dedup, persist, and enqueue. Everything here runs on the request path and
//! must return before the client's HTTP call completes; the actual parse /
//! embed / store work happens later in [`crate::worker::IngestionWorker`].

use crate::payload::{UploadPayload, UrlPayload};
use corpora_blob::{blob_key, content_hash, sanitize_filename, BlobStore};
use corpora_catalog::{DocumentFilter, DocumentRepo, DocumentStats, NewDocument, TenantRepo, UsageRepo};
use corpora_core::document::{DocType, Document};
use corpora_core::{CoreError, DocumentId, TenantId, UsageMetric, UsageMetricType};
use corpora_jobs::{Job, JobKind, JobQueue};
use corpora_vector::VectorIndex;
use std::sync::Arc;
use tracing::warn;

fn content_type_for(doc_type: DocType) -> &'static str {
    match doc_type {
        DocType::Pdf => "application/pdf",
        DocType::Html => "text/html",
        DocType::Txt => "text/plain",
        DocType::Md => "text/markdown",
    }
}

/// Ties blob storage, the document catalog, and the job queue into the
/// document lifecycle state machine (spec §4.11, C11).
#[derive(Clone)]
pub struct IngestionOrchestrator {
    documents: DocumentRepo,
    tenants: TenantRepo,
    blob: Arc<dyn BlobStore>,
    vector: Arc<dyn VectorIndex>,
    queue: Arc<JobQueue>,
    usage: UsageRepo,
}

impl IngestionOrchestrator {
    #[must_use]
    pub fn new(
        documents: DocumentRepo,
        tenants: TenantRepo,
        blob: Arc<dyn BlobStore>,
        vector: Arc<dyn VectorIndex>,
        queue: Arc<JobQueue>,
        usage: UsageRepo,
    ) -> Self {
        Self {
            documents,
            tenants,
            blob,
            vector,
            queue,
            usage,
        }
    }

    /// Fire-and-forget `storage_bytes` write (spec §3 `UsageMetric`, §4.9
    /// "usage metrics are written after response completion").
    fn record_storage_usage(&self, tenant_id: TenantId, document_id: DocumentId, size_bytes: i64) {
        let repo = self.usage.clone();
        let metric = UsageMetric::new(tenant_id, UsageMetricType::StorageBytes, size_bytes as f64)
            .with_document(document_id);
        tokio::spawn(async move {
            if let Err(e) = repo.record(&metric).await {
                warn!(error = %e, tenant_id = %metric.tenant_id, "usage metric write failed");
            }
        });
    }

    /// Validate, persist, store the blob, and enqueue a `process_document`
    /// job. Returns the created row plus the queued job id.
    pub async fn receive_upload(
        &self,
        tenant_id: TenantId,
        filename: &str,
        bytes: Vec<u8>,
        title: Option<String>,
    ) -> Result<(Document, String), CoreError> {
        let doc_type = DocType::from_filename(filename)
            .ok_or_else(|| CoreError::validation("unrecognized file extension"))?;

        let config = self.tenants.config_for(tenant_id).await?;
        if !config
            .allowed_doc_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&doc_type.to_string()))
        {
            return Err(CoreError::validation(format!(
                "document type '{doc_type}' is not allowed for this tenant"
            )));
        }
        let max_bytes = i64::from(config.max_file_size_mb) * 1024 * 1024;
        if bytes.len() as i64 > max_bytes {
            return Err(CoreError::validation(format!(
                "file exceeds the {}MB limit for this tenant",
                config.max_file_size_mb
            )));
        }
        let existing_count = self.documents.count_for_tenant(tenant_id).await?;
        if existing_count >= i64::from(config.max_documents) {
            return Err(CoreError::validation(
                "tenant has reached its document quota",
            ));
        }

        let hash = content_hash(&bytes);
        if let Some(dup) = self.documents.find_by_hash(tenant_id, &hash).await? {
            return Err(CoreError::Conflict {
                message: format!("identical content already ingested as document {}", dup.id),
            });
        }

        let filename = sanitize_filename(filename);
        let document = self
            .documents
            .create(NewDocument {
                id: DocumentId::new(),
                tenant_id,
                title: title.unwrap_or_else(|| filename.clone()),
                doc_type,
                source_url: None,
                content_hash: Some(hash),
                size_bytes: bytes.len() as i64,
            })
            .await?;

        let key = blob_key(tenant_id, document.id, &filename);
        let size_bytes = document.size_bytes;
        self.blob
            .put(&key, bytes, content_type_for(doc_type))
            .await?;
        self.documents.set_blob_key(document.id, &key).await?;
        self.record_storage_usage(tenant_id, document.id, size_bytes);

        let job_id = document.id.to_string();
        let payload = serde_json::to_value(UploadPayload {
            tenant_id,
            document_id: document.id,
            filename,
        })
        .map_err(|e| CoreError::internal(format!("failed to serialize job payload: {e}")))?;
        self.queue
            .enqueue(Job::new(job_id.clone(), JobKind::ProcessDocument, payload));

        Ok((document, job_id))
    }

    /// Validate and enqueue a `scrape_url` job. The document's type is not
    /// known until the worker fetches the URL, so the row is created with a
    /// provisional `html` type that the worker ignores in favor of the
    /// response's actual `Content-Type`.
    pub async fn receive_url(
        &self,
        tenant_id: TenantId,
        url: &str,
        title: Option<String>,
    ) -> Result<(Document, String), CoreError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::validation("url must be http(s)"));
        }
        let config = self.tenants.config_for(tenant_id).await?;
        let existing_count = self.documents.count_for_tenant(tenant_id).await?;
        if existing_count >= i64::from(config.max_documents) {
            return Err(CoreError::validation(
                "tenant has reached its document quota",
            ));
        }

        let document = self
            .documents
            .create(NewDocument {
                id: DocumentId::new(),
                tenant_id,
                title: title.unwrap_or_else(|| url.to_string()),
                doc_type: DocType::Html,
                source_url: Some(url.to_string()),
                content_hash: None,
                size_bytes: 0,
            })
            .await?;

        let job_id = document.id.to_string();
        let payload = serde_json::to_value(UrlPayload {
            tenant_id,
            document_id: document.id,
            url: url.to_string(),
        })
        .map_err(|e| CoreError::internal(format!("failed to serialize job payload: {e}")))?;
        self.queue
            .enqueue(Job::new(job_id.clone(), JobKind::ScrapeUrl, payload));

        Ok((document, job_id))
    }

    pub async fn get_document(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
    ) -> Result<Option<Document>, CoreError> {
        self.documents.get(tenant_id, document_id).await
    }

    pub async fn list_documents(
        &self,
        tenant_id: TenantId,
        filter: &DocumentFilter,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Document>, CoreError> {
        self.documents.list(tenant_id, filter, page, limit).await
    }

    pub async fn stats(&self, tenant_id: TenantId) -> Result<DocumentStats, CoreError> {
        self.documents.stats(tenant_id).await
    }

    /// Active worker proxy for the `/metrics` snapshot (SPEC_FULL §B): each
    /// in-flight job occupies one worker slot.
    pub fn in_flight_jobs(&self) -> usize {
        self.queue.in_flight_len()
    }

    /// Delete vectors, blob, and the catalog row (spec §4.11 Deletion). Both
    /// side stores are attempted regardless of the other's outcome; the
    /// catalog row is only removed if both succeeded, so a partial failure
    /// leaves the document visible for a retried delete rather than
    /// orphaning its content.
    pub async fn delete_document(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
    ) -> Result<(), CoreError> {
        let document = self
            .documents
            .get(tenant_id, document_id)
            .await?
            .ok_or_else(|| CoreError::not_found("document not found"))?;

        let vector_result = self.vector.delete_document(tenant_id, document_id).await;
        if let Err(ref e) = vector_result {
            warn!(document_id = %document_id, error = %e, "vector deletion failed");
        }

        let blob_result = if let Some(key) = &document.blob_key {
            self.blob.delete(key).await
        } else {
            Ok(())
        };
        if let Err(ref e) = blob_result {
            warn!(document_id = %document_id, error = %e, "blob deletion failed");
        }

        if vector_result.is_err() || blob_result.is_err() {
            return Err(CoreError::Internal {
                message: "partial deletion failure, document row retained for retry".to_string(),
            });
        }

        self.documents.delete(tenant_id, document_id).await?;
        Ok(())
    }
}
