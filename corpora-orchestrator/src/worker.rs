//! The `process_document` / `scrape_url` job handler (spec §4.11 "Worker
//! attempt"). One attempt is: acquire bytes, parse, chunk, embed, store
//! vectors, finalize the catalog row — emitting progress at each stage.

use crate::payload::{UploadPayload, UrlPayload};
use crate::progress::{ProgressBus, ProgressEvent};
use corpora_blob::BlobStore;
use corpora_catalog::{DocumentRepo, TenantRepo, UsageRepo};
use corpora_core::document::{DocType, DocumentJobStage, UrlJobStage};
use corpora_core::{CoreError, DocumentId, JobProgress, TenantId, UsageMetric, UsageMetricType};
use corpora_crypto::MasterKey;
use corpora_jobs::{Job, JobHandler, JobKind, JobOutcome};
use corpora_rag::{chunk_text, ChunkParams, EmbedBatchResult, Embedder, EmbeddingModel, HttpEmbedder};
use corpora_vector::{ChunkInput, VectorIndex};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// What a single attempt failed with, and whether a retry is worth trying.
/// Distinct from [`CoreError`] because a handler also needs to classify
/// failures (bad input, unsupported content-type) that never reach a
/// `CoreError` boundary.
struct AttemptError {
    message: String,
    retryable: bool,
}

impl AttemptError {
    fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    fn from_core(e: CoreError) -> Self {
        let retryable = e.is_retryable();
        Self {
            message: e.to_string(),
            retryable,
        }
    }
}

/// Ties blob storage, parsing, chunking, the embedder, and the vector index
/// into one document-processing attempt (spec §4.11, C11/C6/C7).
pub struct IngestionWorker {
    documents: DocumentRepo,
    tenants: TenantRepo,
    vector: Arc<dyn VectorIndex>,
    blob: Arc<dyn BlobStore>,
    usage: UsageRepo,
    progress: Arc<ProgressBus>,
    master_key: MasterKey,
    embedder_base_url: String,
    platform_embedder: Arc<dyn Embedder>,
    http: reqwest::Client,
    /// Mirrors the owning [`corpora_jobs::QueueOptions::max_attempts`] so the
    /// handler knows, on a retryable failure, whether the queue will give it
    /// another attempt or this is the one that must mark the document failed.
    max_attempts: u32,
}

impl IngestionWorker {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: DocumentRepo,
        tenants: TenantRepo,
        vector: Arc<dyn VectorIndex>,
        blob: Arc<dyn BlobStore>,
        usage: UsageRepo,
        progress: Arc<ProgressBus>,
        master_key: MasterKey,
        embedder_base_url: String,
        platform_embedder: Arc<dyn Embedder>,
        max_attempts: u32,
    ) -> Self {
        Self {
            documents,
            tenants,
            vector,
            blob,
            usage,
            progress,
            master_key,
            embedder_base_url,
            platform_embedder,
            http: reqwest::Client::new(),
            max_attempts,
        }
    }

    /// A tenant with its own embedder key uses it (decrypted with the
    /// master key); otherwise the platform's shared embedder handles the
    /// request (spec §4.11: "fall back to the platform key if absent").
    fn resolve_embedder(
        &self,
        embedder_api_key_enc: Option<&str>,
    ) -> Result<Arc<dyn Embedder>, AttemptError> {
        match embedder_api_key_enc {
            Some(blob) => {
                let key_bytes = corpora_crypto::decrypt(&self.master_key, blob)
                    .map_err(AttemptError::from_core)?;
                let key = String::from_utf8(key_bytes)
                    .map_err(|_| AttemptError::fatal("tenant embedder key is not valid utf-8"))?;
                Ok(Arc::new(HttpEmbedder::new(
                    self.embedder_base_url.clone(),
                    key,
                )))
            }
            None => Ok(self.platform_embedder.clone()),
        }
    }

    async fn embed_and_store(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
        text: &str,
        title: Option<String>,
        embedder_api_key_enc: Option<&str>,
    ) -> Result<EmbedBatchResult, AttemptError> {
        let config = self
            .tenants
            .config_for(tenant_id)
            .await
            .map_err(AttemptError::from_core)?;
        let chunks = chunk_text(
            text,
            ChunkParams {
                chunk_size: config.chunk_size.max(1) as usize,
                overlap: config.chunk_overlap.max(0) as usize,
            },
        );
        if chunks.is_empty() {
            return Err(AttemptError::fatal("document produced no chunks"));
        }

        let embedder = self.resolve_embedder(embedder_api_key_enc)?;
        let model = EmbeddingModel::parse(&config.embedding_model);
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embed_result = embedder
            .embed_batch(&texts, model)
            .await
            .map_err(AttemptError::from_core)?;
        if embed_result.vectors.len() != chunks.len() {
            return Err(AttemptError::retryable(
                "embedder returned a mismatched number of vectors",
            ));
        }

        let inputs: Vec<ChunkInput> = chunks
            .iter()
            .zip(embed_result.vectors.iter())
            .map(|(c, v)| ChunkInput {
                chunk_index: c.chunk_index as i32,
                content: c.content.clone(),
                embedding: v.clone(),
                start_char: c.start_char as i32,
                end_char: c.end_char as i32,
                title: title.clone(),
            })
            .collect();
        self.vector
            .add_chunks(tenant_id, document_id, &inputs)
            .await
            .map_err(AttemptError::from_core)?;

        Ok(embed_result)
    }

    async fn finalize(
        &self,
        document_id: DocumentId,
        chunk_count: usize,
        character_count: usize,
        page_count: Option<i32>,
        embed_result: &EmbedBatchResult,
        started_at: Instant,
    ) -> Result<(), AttemptError> {
        self.documents
            .mark_completed(
                document_id,
                chunk_count as i32,
                character_count as i32,
                page_count,
                embed_result.tokens_used as i64,
                embed_result.cost_usd,
                started_at.elapsed().as_millis() as i64,
            )
            .await
            .map_err(AttemptError::from_core)
    }

    fn record_usage(&self, tenant_id: TenantId, document_id: DocumentId, embed_result: &EmbedBatchResult) {
        let repo = self.usage.clone();
        let tokens_metric = UsageMetric::new(
            tenant_id,
            UsageMetricType::EmbeddingTokens,
            embed_result.tokens_used as f64,
        )
        .with_document(document_id)
        .with_cost(embed_result.cost_usd);
        let processed_metric =
            UsageMetric::new(tenant_id, UsageMetricType::DocumentProcessed, 1.0).with_document(document_id);
        tokio::spawn(async move {
            if let Err(e) = repo.record(&tokens_metric).await {
                tracing::warn!(error = %e, "usage metric write failed");
            }
            if let Err(e) = repo.record(&processed_metric).await {
                tracing::warn!(error = %e, "usage metric write failed");
            }
        });
    }

    async fn process_document(&self, payload: &UploadPayload) -> Result<(), AttemptError> {
        let UploadPayload {
            tenant_id,
            document_id,
            filename,
        } = payload;
        let (tenant_id, document_id) = (*tenant_id, *document_id);
        let started_at = Instant::now();

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::document(DocumentJobStage::Downloading),
        });
        let document = self
            .documents
            .get(tenant_id, document_id)
            .await
            .map_err(AttemptError::from_core)?
            .ok_or_else(|| AttemptError::fatal("document row disappeared before processing"))?;
        let blob_key = document
            .blob_key
            .ok_or_else(|| AttemptError::fatal("document has no blob key"))?;
        let bytes = self
            .blob
            .get(&blob_key)
            .await
            .map_err(AttemptError::from_core)?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::document(DocumentJobStage::Parsing),
        });
        let doc_type = DocType::from_filename(filename)
            .ok_or_else(|| AttemptError::fatal("unrecognized file extension"))?;
        let parsed = corpora_parsers::parse(doc_type, &bytes).map_err(AttemptError::from_core)?;

        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await
            .map_err(AttemptError::from_core)?
            .ok_or_else(|| AttemptError::fatal("tenant not found"))?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::document(DocumentJobStage::Embedding),
        });
        let embed_result = self
            .embed_and_store(
                tenant_id,
                document_id,
                &parsed.text,
                parsed.title.clone(),
                tenant.embedder_api_key_enc.as_deref(),
            )
            .await?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::document(DocumentJobStage::Storing),
        });
        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::document(DocumentJobStage::Finalizing),
        });
        self.finalize(
            document_id,
            embed_result.vectors.len(),
            parsed.text.chars().count(),
            parsed.page_count,
            &embed_result,
            started_at,
        )
        .await?;

        self.record_usage(tenant_id, document_id, &embed_result);
        self.progress.emit(ProgressEvent::Completed {
            tenant_id,
            document_id,
        });
        Ok(())
    }

    async fn process_url(&self, payload: &UrlPayload) -> Result<(), AttemptError> {
        let UrlPayload {
            tenant_id,
            document_id,
            url,
        } = payload;
        let (tenant_id, document_id) = (*tenant_id, *document_id);
        let started_at = Instant::now();

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::url(UrlJobStage::Fetching),
        });
        let response = self.http.get(url).send().await.map_err(|e| {
            AttemptError::retryable(format!("failed to fetch url: {e}"))
        })?;
        if !response.status().is_success() {
            return Err(AttemptError::fatal(format!(
                "url fetch returned status {}",
                response.status()
            )));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttemptError::retryable(format!("failed to read response body: {e}")))?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::url(UrlJobStage::Parsing),
        });
        let doc_type = if content_type.starts_with("text/html") {
            DocType::Html
        } else if content_type.starts_with("text/plain") {
            DocType::Txt
        } else {
            return Err(AttemptError::fatal(format!(
                "unsupported content-type for url ingestion: {content_type}"
            )));
        };
        let parsed = corpora_parsers::parse(doc_type, &bytes).map_err(AttemptError::from_core)?;

        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await
            .map_err(AttemptError::from_core)?
            .ok_or_else(|| AttemptError::fatal("tenant not found"))?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::url(UrlJobStage::Embedding),
        });
        let embed_result = self
            .embed_and_store(
                tenant_id,
                document_id,
                &parsed.text,
                parsed.title.clone(),
                tenant.embedder_api_key_enc.as_deref(),
            )
            .await?;

        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::url(UrlJobStage::Storing),
        });
        self.progress.emit(ProgressEvent::Progress {
            tenant_id,
            document_id,
            progress: JobProgress::url(UrlJobStage::Finalizing),
        });
        self.finalize(
            document_id,
            embed_result.vectors.len(),
            parsed.text.chars().count(),
            parsed.page_count,
            &embed_result,
            started_at,
        )
        .await?;

        self.record_usage(tenant_id, document_id, &embed_result);
        self.progress.emit(ProgressEvent::Completed {
            tenant_id,
            document_id,
        });
        Ok(())
    }

    async fn mark_failed(&self, tenant_id: TenantId, document_id: DocumentId, message: &str) {
        if let Err(e) = self.documents.mark_failed(document_id, message).await {
            error!(document_id = %document_id, error = %e, "failed to record document failure");
        }
        self.progress.emit(ProgressEvent::Failed {
            tenant_id,
            document_id,
            message: message.to_string(),
        });
    }
}

#[async_trait::async_trait]
impl JobHandler for IngestionWorker {
    async fn handle(&self, job: &Job) -> JobOutcome {
        let result = match job.kind {
            JobKind::ProcessDocument => {
                let payload: UploadPayload = match serde_json::from_value(job.payload.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        error!(job_id = %job.id, error = %e, "malformed upload job payload");
                        return JobOutcome::FatalFailure;
                    }
                };
                let (tenant_id, document_id) = (payload.tenant_id, payload.document_id);
                self.process_document(&payload)
                    .await
                    .map_err(|e| (tenant_id, document_id, e))
            }
            JobKind::ScrapeUrl => {
                let payload: UrlPayload = match serde_json::from_value(job.payload.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        error!(job_id = %job.id, error = %e, "malformed url job payload");
                        return JobOutcome::FatalFailure;
                    }
                };
                let (tenant_id, document_id) = (payload.tenant_id, payload.document_id);
                self.process_url(&payload)
                    .await
                    .map_err(|e| (tenant_id, document_id, e))
            }
        };

        match result {
            Ok(()) => {
                info!(job_id = %job.id, "ingestion job completed");
                JobOutcome::Completed
            }
            Err((tenant_id, document_id, attempt_err)) => {
                let will_retry = attempt_err.retryable && job.attempts < self.max_attempts;
                if !will_retry {
                    self.mark_failed(tenant_id, document_id, &attempt_err.message)
                        .await;
                }
                if attempt_err.retryable {
                    JobOutcome::RetryableFailure
                } else {
                    JobOutcome::FatalFailure
                }
            }
        }
    }
}
