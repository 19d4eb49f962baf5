//! Document row repository (spec §3 `Document`, §4.11).

use crate::error::{map_pg_error, map_pool_error};
use corpora_core::document::{DocType, Document, DocumentStatus};
use corpora_core::{CoreError, DocumentId, TenantId};
use deadpool_postgres::Pool;
use uuid::Uuid;

#[derive(Clone)]
pub struct DocumentRepo {
    pool: Pool,
}

fn parse_doc_type(s: &str) -> DocType {
    match s {
        "pdf" => DocType::Pdf,
        "html" => DocType::Html,
        "md" => DocType::Md,
        _ => DocType::Txt,
    }
}

fn parse_status(s: &str) -> DocumentStatus {
    match s {
        "completed" => DocumentStatus::Completed,
        "failed" => DocumentStatus::Failed,
        _ => DocumentStatus::Processing,
    }
}

fn row_to_document(row: &tokio_postgres::Row) -> Document {
    let id: Uuid = row.get("id");
    let tenant_id: Uuid = row.get("customer_id");
    Document {
        id: DocumentId(id),
        tenant_id: TenantId::from_uuid(tenant_id),
        title: row.get("title"),
        doc_type: parse_doc_type(row.get("doc_type")),
        source_url: row.get("source_url"),
        blob_key: row.get("blob_key"),
        content_hash: row.get("content_hash"),
        size_bytes: row.get("size_bytes"),
        status: parse_status(row.get("status")),
        chunk_count: row.get("chunk_count"),
        character_count: row.get("character_count"),
        page_count: row.get("page_count"),
        embedding_tokens_used: row.get("embedding_tokens_used"),
        embedding_cost_usd: row.get("embedding_cost_usd"),
        processing_time_ms: row.get("processing_time_ms"),
        error_message: row.get("error_message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct NewDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub title: String,
    pub doc_type: DocType,
    pub source_url: Option<String>,
    pub content_hash: Option<String>,
    pub size_bytes: i64,
}

#[derive(Default)]
pub struct DocumentFilter {
    pub status: Option<DocumentStatus>,
    pub doc_type: Option<DocType>,
}

pub struct DocumentStats {
    pub total: i64,
    pub by_status: Vec<(String, i64)>,
    pub by_type: Vec<(String, i64)>,
}

impl DocumentRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a document row in `processing` status. Returns
    /// [`CoreError::Conflict`] when `(tenant_id, content_hash)` already
    /// exists (spec §3 dedup invariant).
    pub async fn create(&self, new: NewDocument) -> Result<Document, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_one(
                "INSERT INTO documents
                    (id, customer_id, title, doc_type, source_url, content_hash, size_bytes, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, 'processing')
                 RETURNING *",
                &[
                    &new.id.0,
                    &new.tenant_id.0,
                    &new.title,
                    &new.doc_type.to_string(),
                    &new.source_url,
                    &new.content_hash,
                    &new.size_bytes,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row_to_document(&row))
    }

    pub async fn find_by_hash(
        &self,
        tenant_id: TenantId,
        content_hash: &str,
    ) -> Result<Option<Document>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM documents WHERE customer_id = $1 AND content_hash = $2",
                &[&tenant_id.0, &content_hash],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_document))
    }

    pub async fn get(&self, tenant_id: TenantId, id: DocumentId) -> Result<Option<Document>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM documents WHERE customer_id = $1 AND id = $2",
                &[&tenant_id.0, &id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_document))
    }

    pub async fn set_blob_key(&self, id: DocumentId, blob_key: &str) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE documents SET blob_key = $2, updated_at = now() WHERE id = $1",
                &[&id.0, &blob_key],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    /// Monotonic within an attempt: callers must not call this after
    /// [`Self::mark_failed`] within the same attempt (spec §5 Ordering).
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_completed(
        &self,
        id: DocumentId,
        chunk_count: i32,
        character_count: i32,
        page_count: Option<i32>,
        embedding_tokens_used: i64,
        embedding_cost_usd: f64,
        processing_time_ms: i64,
    ) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE documents SET
                    status = 'completed', chunk_count = $2, character_count = $3,
                    page_count = $4, embedding_tokens_used = $5, embedding_cost_usd = $6,
                    processing_time_ms = $7, error_message = NULL, updated_at = now()
                 WHERE id = $1 AND status = 'processing'",
                &[
                    &id.0,
                    &chunk_count,
                    &character_count,
                    &page_count,
                    &embedding_tokens_used,
                    &embedding_cost_usd,
                    &processing_time_ms,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    pub async fn mark_failed(&self, id: DocumentId, error_message: &str) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE documents SET status = 'failed', error_message = $2, updated_at = now()
                 WHERE id = $1 AND status = 'processing'",
                &[&id.0, &error_message],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    pub async fn list(
        &self,
        tenant_id: TenantId,
        filter: &DocumentFilter,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Document>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let offset = (page.max(1) - 1) * limit;
        let status_filter = filter.status.map(|s| match s {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        });
        let type_filter = filter.doc_type.map(|t| t.to_string());

        let rows = client
            .query(
                "SELECT * FROM documents
                 WHERE customer_id = $1
                   AND ($2::text IS NULL OR status = $2)
                   AND ($3::text IS NULL OR doc_type = $3)
                 ORDER BY created_at DESC
                 LIMIT $4 OFFSET $5",
                &[&tenant_id.0, &status_filter, &type_filter, &limit, &offset],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(rows.iter().map(row_to_document).collect())
    }

    pub async fn stats(&self, tenant_id: TenantId) -> Result<DocumentStats, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let total_row = client
            .query_one(
                "SELECT count(*) FROM documents WHERE customer_id = $1",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        let by_status = client
            .query(
                "SELECT status, count(*) FROM documents WHERE customer_id = $1 GROUP BY status",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?
            .iter()
            .map(|r| (r.get::<_, String>(0), r.get::<_, i64>(1)))
            .collect();
        let by_type = client
            .query(
                "SELECT doc_type, count(*) FROM documents WHERE customer_id = $1 GROUP BY doc_type",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?
            .iter()
            .map(|r| (r.get::<_, String>(0), r.get::<_, i64>(1)))
            .collect();
        Ok(DocumentStats {
            total: total_row.get(0),
            by_status,
            by_type,
        })
    }

    pub async fn count_for_tenant(&self, tenant_id: TenantId) -> Result<i64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_one(
                "SELECT count(*) FROM documents WHERE customer_id = $1",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.get(0))
    }

    /// Delete the document row. Callers must also delete vectors (C3) and
    /// the blob (C4); all three are attempted regardless of individual
    /// failure (spec §4.11 Deletion).
    pub async fn delete(&self, tenant_id: TenantId, id: DocumentId) -> Result<bool, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let affected = client
            .execute(
                "DELETE FROM documents WHERE customer_id = $1 AND id = $2",
                &[&tenant_id.0, &id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(affected > 0)
    }
}
