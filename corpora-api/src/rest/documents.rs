//! `/api/documents/*` handlers (spec §6.2, §4.11). Every handler here runs
//! behind [`crate::middleware::jwt_auth_then_rate_limit`].

use crate::error::ApiError;
use crate::middleware::Authed;
use crate::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::{Extension, Json};
use corpora_catalog::DocumentFilter;
use corpora_core::document::{DocType, Document, DocumentStatus};
use corpora_core::{CoreError, DocumentId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
pub struct UploadResponse {
    pub document: Document,
    pub job_id: String,
}

/// `POST /api/documents/upload` — multipart form with a single `file` part
/// and an optional `title` field (spec §6.2).
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CoreError::validation(format!("malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                filename = field.file_name().map(str::to_string);
                bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| CoreError::validation(format!("failed to read file part: {e}")))?
                        .to_vec(),
                );
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| CoreError::validation(format!("failed to read title part: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| CoreError::validation("missing file part"))?;
    let bytes = bytes.ok_or_else(|| CoreError::validation("missing file contents"))?;

    let (document, job_id) = state
        .orchestrator
        .receive_upload(tenant.tenant_id, &filename, bytes, title)
        .await?;
    Ok(Json(UploadResponse { document, job_id }))
}

#[derive(Deserialize)]
pub struct UrlIngestRequest {
    pub url: String,
    pub title: Option<String>,
}

/// `POST /api/documents/url`.
pub async fn ingest_url(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Json(req): Json<UrlIngestRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let (document, job_id) = state
        .orchestrator
        .receive_url(tenant.tenant_id, &req.url, req.title)
        .await?;
    Ok(Json(UploadResponse { document, job_id }))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub doc_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn parse_status(s: &str) -> Result<DocumentStatus, ApiError> {
    match s {
        "processing" => Ok(DocumentStatus::Processing),
        "completed" => Ok(DocumentStatus::Completed),
        "failed" => Ok(DocumentStatus::Failed),
        other => Err(CoreError::validation(format!("unknown status '{other}'")).into()),
    }
}

fn parse_doc_type(s: &str) -> Result<DocType, ApiError> {
    match s {
        "pdf" => Ok(DocType::Pdf),
        "txt" => Ok(DocType::Txt),
        "html" => Ok(DocType::Html),
        "md" => Ok(DocType::Md),
        other => Err(CoreError::validation(format!("unknown doc_type '{other}'")).into()),
    }
}

/// `GET /api/documents`.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = DocumentFilter {
        status: q.status.as_deref().map(parse_status).transpose()?,
        doc_type: q.doc_type.as_deref().map(parse_doc_type).transpose()?,
    };
    let page = q.page.unwrap_or(1);
    let limit = q.limit.unwrap_or(20).clamp(1, 200);
    let docs = state
        .orchestrator
        .list_documents(tenant.tenant_id, &filter, page, limit)
        .await?;
    Ok(Json(docs))
}

/// `GET /api/documents/stats`.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let s = state.orchestrator.stats(tenant.tenant_id).await?;
    Ok(Json(serde_json::json!({
        "total": s.total,
        "by_status": s.by_status,
        "by_type": s.by_type,
    })))
}

fn parse_document_id(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse::<DocumentId>()
        .map_err(|_| CoreError::validation("invalid document id").into())
}

/// `GET /api/documents/:id`.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_document_id(&id)?;
    let doc = state
        .orchestrator
        .get_document(tenant.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("document not found"))?;
    Ok(Json(doc))
}

#[derive(Serialize)]
pub struct DocumentStatusResponse {
    pub status: DocumentStatus,
    pub error_message: Option<String>,
}

/// `GET /api/documents/:id/status` — cheap polling endpoint distinct from
/// the full document fetch (spec §6.2).
pub async fn status(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Path(id): Path<String>,
) -> Result<Json<DocumentStatusResponse>, ApiError> {
    let id = parse_document_id(&id)?;
    let doc = state
        .orchestrator
        .get_document(tenant.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("document not found"))?;
    Ok(Json(DocumentStatusResponse {
        status: doc.status,
        error_message: doc.error_message,
    }))
}

/// `DELETE /api/documents/:id`.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    let id = parse_document_id(&id)?;
    state.orchestrator.delete_document(tenant.tenant_id, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct DownloadResponse {
    pub url: String,
}

const PRESIGN_TTL: Duration = Duration::from_secs(900);

/// `GET /api/documents/:id/download` — a short-lived presigned link rather
/// than proxying the blob through this process.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let id = parse_document_id(&id)?;
    let doc = state
        .orchestrator
        .get_document(tenant.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("document not found"))?;
    let key = doc
        .blob_key
        .ok_or_else(|| CoreError::validation("document has no stored content yet"))?;
    let url = state.blob.presigned_url(&key, PRESIGN_TTL).await?;
    Ok(Json(DownloadResponse { url }))
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
    pub min_score: Option<f32>,
    pub document_id: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResult {
    pub document_id: String,
    pub chunk_index: i32,
    pub content: String,
    pub title: Option<String>,
    pub score: f32,
}

/// `POST /api/documents/search` — embeds the query with the platform
/// embedder and searches the tenant's own chunks.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    if req.query.trim().is_empty() {
        return Err(CoreError::validation("query must not be empty").into());
    }
    let document_id = req.document_id.as_deref().map(parse_document_id).transpose()?;
    let config = state.tenants.config_for(tenant.tenant_id).await?;
    let model = corpora_rag::EmbeddingModel::parse(&config.embedding_model);
    let tenant_row = state
        .tenants
        .find_by_id(tenant.tenant_id)
        .await?
        .ok_or_else(|| CoreError::not_found("tenant not found"))?;
    let embedder = state.embedder_for(&tenant_row).await?;

    let embedded = embedder.embed_batch(&[req.query.clone()], model).await?;
    let query_vector = embedded
        .vectors
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::internal("embedder returned no vector for the query"))?;

    let top_k = req.top_k.unwrap_or(10).clamp(1, 100);
    let min_score = req.min_score.unwrap_or(0.0);
    let search_started = std::time::Instant::now();
    let results = state
        .vector
        .search(tenant.tenant_id, &query_vector, top_k, min_score, document_id)
        .await?;
    state.metrics.observe_search_latency(search_started.elapsed());

    state.usage.record_async(corpora_core::UsageMetric::new(
        tenant.tenant_id,
        corpora_core::UsageMetricType::SearchQuery,
        1.0,
    ));

    Ok(Json(
        results
            .into_iter()
            .map(|r| SearchResult {
                document_id: r.document_id.to_string(),
                chunk_index: r.chunk_index,
                content: r.content,
                title: r.title,
                score: r.score,
            })
            .collect(),
    ))
}
