use crate::error::{map_pg_error, map_pool_error};
use crate::models::{ChunkInput, ChunkRow, Dimension, ScoredChunk};
use async_trait::async_trait;
use corpora_core::{CoreError, DocumentId, TenantId};
use deadpool_postgres::Pool;
use pgvector::Vector;

/// Tenant-isolated chunk storage and ANN search, routed to the physical
/// table matching each vector's dimensionality.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn add_chunks(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
        chunks: &[ChunkInput],
    ) -> Result<usize, CoreError>;

    async fn search(
        &self,
        tenant_id: TenantId,
        query: &[f32],
        top_k: usize,
        min_score: f32,
        document_id: Option<DocumentId>,
    ) -> Result<Vec<ScoredChunk>, CoreError>;

    async fn get_chunk_range(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
        start_index: i32,
        end_index: i32,
    ) -> Result<Vec<ChunkRow>, CoreError>;

    async fn delete_document(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
    ) -> Result<u64, CoreError>;
}

#[derive(Clone)]
pub struct PgVectorIndex {
    pool: Pool,
}

impl PgVectorIndex {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn clamp_score(raw: f64) -> f32 {
    raw.clamp(-1.0, 1.0) as f32
}

#[async_trait]
impl VectorIndex for PgVectorIndex {
    async fn add_chunks(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
        chunks: &[ChunkInput],
    ) -> Result<usize, CoreError> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let dim = Dimension::from_len(chunks[0].embedding.len())?;
        for c in chunks {
            if c.embedding.len() != chunks[0].embedding.len() {
                return Err(CoreError::validation(
                    "all chunks in a batch must share one embedding dimension",
                ));
            }
        }

        let mut client = self.pool.get().await.map_err(map_pool_error)?;
        let txn = client.transaction().await.map_err(map_pg_error)?;
        let table = dim.table();
        let sql = format!(
            "INSERT INTO {table}
                (id, customer_id, document_id, chunk_index, content, embedding, start_char, end_char, title)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (document_id, chunk_index) DO UPDATE SET
                content = excluded.content,
                embedding = excluded.embedding,
                start_char = excluded.start_char,
                end_char = excluded.end_char,
                title = excluded.title"
        );
        for chunk in chunks {
            let id = format!("{document_id}:{}", chunk.chunk_index);
            let vector = Vector::from(chunk.embedding.clone());
            txn.execute(
                sql.as_str(),
                &[
                    &id,
                    &tenant_id.0,
                    &document_id.0,
                    &chunk.chunk_index,
                    &chunk.content,
                    &vector,
                    &chunk.start_char,
                    &chunk.end_char,
                    &chunk.title,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        }
        txn.commit().await.map_err(map_pg_error)?;
        Ok(chunks.len())
    }

    async fn search(
        &self,
        tenant_id: TenantId,
        query: &[f32],
        top_k: usize,
        min_score: f32,
        document_id: Option<DocumentId>,
    ) -> Result<Vec<ScoredChunk>, CoreError> {
        let dim = Dimension::from_len(query.len())?;
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let table = dim.table();
        let sql = format!(
            "SELECT document_id, chunk_index, content, title, 1 - (embedding <=> $1) AS score
             FROM {table}
             WHERE customer_id = $2 AND ($4::uuid IS NULL OR document_id = $4)
             ORDER BY embedding <=> $1 ASC, document_id ASC, chunk_index ASC
             LIMIT $3"
        );
        let vector = Vector::from(query.to_vec());
        let doc_filter = document_id.map(|d| d.0);
        let rows = client
            .query(
                sql.as_str(),
                &[&vector, &tenant_id.0, &(top_k as i64), &doc_filter],
            )
            .await
            .map_err(map_pg_error)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let score = clamp_score(row.get::<_, f64>("score"));
            if score < min_score {
                continue;
            }
            out.push(ScoredChunk {
                document_id: DocumentId::from_uuid(row.get("document_id")),
                chunk_index: row.get("chunk_index"),
                content: row.get("content"),
                title: row.get("title"),
                score,
            });
        }
        Ok(out)
    }

    async fn get_chunk_range(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
        start_index: i32,
        end_index: i32,
    ) -> Result<Vec<ChunkRow>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        for table in [Dimension::D1536.table(), Dimension::D3072.table()] {
            let sql = format!(
                "SELECT document_id, chunk_index, content, start_char, end_char, title
                 FROM {table}
                 WHERE customer_id = $1 AND document_id = $2
                   AND chunk_index >= $3 AND chunk_index <= $4
                 ORDER BY chunk_index ASC"
            );
            let rows = client
                .query(
                    sql.as_str(),
                    &[&tenant_id.0, &document_id.0, &start_index, &end_index],
                )
                .await
                .map_err(map_pg_error)?;
            if !rows.is_empty() {
                return Ok(rows
                    .into_iter()
                    .map(|row| ChunkRow {
                        document_id: DocumentId::from_uuid(row.get("document_id")),
                        chunk_index: row.get("chunk_index"),
                        content: row.get("content"),
                        start_char: row.get("start_char"),
                        end_char: row.get("end_char"),
                        title: row.get("title"),
                    })
                    .collect());
            }
        }
        Ok(Vec::new())
    }

    async fn delete_document(
        &self,
        tenant_id: TenantId,
        document_id: DocumentId,
    ) -> Result<u64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let mut total = 0u64;
        for table in [Dimension::D1536.table(), Dimension::D3072.table()] {
            let sql =
                format!("DELETE FROM {table} WHERE customer_id = $1 AND document_id = $2");
            total += client
                .execute(sql.as_str(), &[&tenant_id.0, &document_id.0])
                .await
                .map_err(map_pg_error)?;
        }
        Ok(total)
    }
}
