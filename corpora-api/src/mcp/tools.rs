//! The fixed MCP tool catalog (spec §6.3): read-only document search and
//! inspection tools, each tenant-scoped by the API key resolved at the
//! transport layer. Parameter validation happens here, before dispatch, so
//! a malformed call never reaches a repository with a half-checked filter.

use crate::mcp::protocol::INVALID_PARAMS;
use crate::state::AppState;
use corpora_core::document::{DocType, DocumentStatus};
use corpora_core::{CoreError, DocumentId, TenantId};
use corpora_rag::{RerankCandidate, Reranker};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
}

pub const TOOLS: &[ToolDef] = &[
    ToolDef {
        name: "search_documents",
        description: "Semantic search over this tenant's ingested documents",
        input_schema: search_documents_schema,
    },
    ToolDef {
        name: "list_documents",
        description: "List this tenant's documents, optionally filtered by status or type",
        input_schema: list_documents_schema,
    },
    ToolDef {
        name: "get_document",
        description: "Fetch a single document's metadata by id",
        input_schema: get_document_schema,
    },
    ToolDef {
        name: "get_stats",
        description: "Document and usage statistics for this tenant",
        input_schema: empty_schema,
    },
    ToolDef {
        name: "get_document_overview",
        description: "A document's metadata plus a sample of evenly-spaced chunks",
        input_schema: get_document_overview_schema,
    },
    ToolDef {
        name: "compare_documents",
        description: "Run one query against several documents and compare ranked passages",
        input_schema: compare_documents_schema,
    },
];

fn empty_schema() -> Value {
    json!({ "type": "object", "properties": {}, "additionalProperties": false })
}

fn search_documents_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string" },
            "limit": { "type": "integer", "minimum": 1, "maximum": 50 },
            "document_id": { "type": "string" },
            "context_chunks": { "type": "integer", "minimum": 0, "maximum": 3 },
            "output_format": { "type": "string", "enum": ["text", "json"] },
            "rerank": { "type": "boolean" },
            "min_score": { "type": "number", "minimum": 0, "maximum": 1 },
            "group_by_document": { "type": "boolean" }
        },
        "required": ["query"],
        "additionalProperties": false
    })
}

fn list_documents_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "status": { "type": "string", "enum": ["processing", "completed", "failed"] },
            "doc_type": { "type": "string", "enum": ["pdf", "txt", "html", "md"] },
            "limit": { "type": "integer", "minimum": 1, "maximum": 100 },
            "page": { "type": "integer", "minimum": 1 }
        },
        "additionalProperties": false
    })
}

fn get_document_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "document_id": { "type": "string" } },
        "required": ["document_id"],
        "additionalProperties": false
    })
}

fn get_document_overview_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "document_id": { "type": "string" },
            "sample_size": { "type": "integer", "minimum": 3, "maximum": 10 }
        },
        "required": ["document_id"],
        "additionalProperties": false
    })
}

fn compare_documents_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string" },
            "document_ids": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 2,
                "maxItems": 10
            },
            "results_per_document": { "type": "integer", "minimum": 1, "maximum": 10 }
        },
        "required": ["query", "document_ids"],
        "additionalProperties": false
    })
}

/// Params validation failure, carrying the JSON-RPC code it must surface as.
pub struct ToolError {
    pub code: i64,
    pub message: String,
}

impl From<CoreError> for ToolError {
    fn from(e: CoreError) -> Self {
        Self {
            code: crate::mcp::protocol::INTERNAL_ERROR,
            message: e.to_string(),
        }
    }
}

fn invalid_params(message: impl Into<String>) -> ToolError {
    ToolError {
        code: INVALID_PARAMS,
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> ToolError {
    ToolError {
        code: crate::mcp::protocol::INTERNAL_ERROR,
        message: message.into(),
    }
}

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid_params(format!("missing or invalid '{key}'")))
}

fn parse_document_id(raw: &str) -> Result<DocumentId, ToolError> {
    raw.parse()
        .map_err(|_| invalid_params(format!("'{raw}' is not a valid document id")))
}

fn clamped_u64(params: &Value, key: &str, default: u64, lo: u64, hi: u64) -> u64 {
    params
        .get(key)
        .and_then(Value::as_u64)
        .unwrap_or(default)
        .clamp(lo, hi)
}

pub async fn call(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    name: &str,
    params: &Value,
) -> Result<Value, ToolError> {
    match name {
        "search_documents" => search_documents(state, tenant_id, params).await,
        "list_documents" => list_documents(state, tenant_id, params).await,
        "get_document" => get_document(state, tenant_id, params).await,
        "get_stats" => get_stats(state, tenant_id).await,
        "get_document_overview" => get_document_overview(state, tenant_id, params).await,
        "compare_documents" => compare_documents(state, tenant_id, params).await,
        other => Err(ToolError {
            code: crate::mcp::protocol::METHOD_NOT_FOUND,
            message: format!("unknown tool '{other}'"),
        }),
    }
}

/// Shared by `search_documents` and `compare_documents`: embed `query` with
/// the tenant's own embedder (falling back to the platform key) and return
/// ranked chunks, each optionally padded with `context_chunks` neighbors on
/// either side (spec §6.3, §4.3 `GetChunkRange`).
async fn ranked_passages(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    query: &str,
    limit: usize,
    min_score: f32,
    document_id: Option<DocumentId>,
    context_chunks: i32,
) -> Result<Vec<Value>, ToolError> {
    let config = state.tenants.config_for(tenant_id).await?;
    let model = corpora_rag::EmbeddingModel::parse(&config.embedding_model);
    let tenant = state
        .tenants
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| not_found("tenant not found"))?;
    let embedder = state.embedder_for(&tenant).await?;
    let embedded = embedder.embed_batch(&[query.to_string()], model).await?;
    let query_vector = embedded
        .vectors
        .into_iter()
        .next()
        .ok_or_else(|| not_found("embedder returned no vector for the query"))?;

    let search_started = std::time::Instant::now();
    let results = state
        .vector
        .search(tenant_id, &query_vector, limit, min_score, document_id)
        .await?;
    state.metrics.observe_search_latency(search_started.elapsed());

    let mut passages = Vec::with_capacity(results.len());
    for r in results {
        let mut entry = json!({
            "document_id": r.document_id.to_string(),
            "chunk_index": r.chunk_index,
            "content": r.content,
            "title": r.title,
            "score": r.score,
        });
        if context_chunks > 0 {
            let lo = (r.chunk_index - context_chunks).max(0);
            let hi = r.chunk_index + context_chunks;
            let window = state
                .vector
                .get_chunk_range(tenant_id, r.document_id, lo, hi)
                .await?;
            let before: Vec<Value> = window
                .iter()
                .filter(|c| c.chunk_index < r.chunk_index)
                .map(|c| json!({ "chunk_index": c.chunk_index, "content": c.content }))
                .collect();
            let after: Vec<Value> = window
                .iter()
                .filter(|c| c.chunk_index > r.chunk_index)
                .map(|c| json!({ "chunk_index": c.chunk_index, "content": c.content }))
                .collect();
            entry["context"] = json!({ "before": before, "after": after });
        }
        passages.push(entry);
    }
    Ok(passages)
}

async fn apply_rerank(
    reranker: &dyn Reranker,
    query: &str,
    passages: Vec<Value>,
) -> Result<Vec<Value>, ToolError> {
    let candidates: Vec<RerankCandidate> = passages
        .iter()
        .enumerate()
        .map(|(i, p)| RerankCandidate {
            index: i,
            content: p.get("content").and_then(Value::as_str).unwrap_or_default().to_string(),
        })
        .collect();
    let reranked = reranker.rerank(query, &candidates).await?;
    let mut out = Vec::with_capacity(reranked.len());
    for r in reranked {
        if let Some(mut p) = passages.get(r.index).cloned() {
            p["score"] = json!(r.score);
            out.push(p);
        }
    }
    Ok(out)
}

fn group_passages_by_document(passages: Vec<Value>) -> Value {
    use std::collections::BTreeMap;
    let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();
    for p in passages {
        let doc_id = p.get("document_id").and_then(Value::as_str).unwrap_or_default().to_string();
        if !groups.contains_key(&doc_id) {
            order.push(doc_id.clone());
        }
        groups.entry(doc_id).or_default().push(p);
    }
    json!(order
        .into_iter()
        .map(|doc_id| {
            let passages = groups.remove(&doc_id).unwrap_or_default();
            json!({ "document_id": doc_id, "passages": passages })
        })
        .collect::<Vec<_>>())
}

async fn search_documents(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    params: &Value,
) -> Result<Value, ToolError> {
    let query = required_str(params, "query")?;
    let limit = clamped_u64(params, "limit", 10, 1, 50) as usize;
    let min_score = params
        .get("min_score")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    let document_id = match params.get("document_id").and_then(Value::as_str) {
        Some(raw) => Some(parse_document_id(raw)?),
        None => None,
    };
    let context_chunks = clamped_u64(params, "context_chunks", 0, 0, 3) as i32;
    let output_format = params.get("output_format").and_then(Value::as_str).unwrap_or("text");
    if output_format != "text" && output_format != "json" {
        return Err(invalid_params("output_format must be 'text' or 'json'"));
    }
    let rerank = params.get("rerank").and_then(Value::as_bool).unwrap_or(false);
    let group_by_document = params
        .get("group_by_document")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut passages = ranked_passages(
        state,
        tenant_id,
        query,
        limit,
        min_score,
        document_id,
        context_chunks,
    )
    .await?;

    if rerank {
        passages = apply_rerank(state.reranker.as_ref(), query, passages).await?;
    }

    state.usage.record_async(corpora_core::UsageMetric::new(
        tenant_id,
        corpora_core::UsageMetricType::SearchQuery,
        1.0,
    ));

    let results = if group_by_document {
        group_passages_by_document(passages)
    } else {
        json!(passages)
    };

    Ok(json!({ "output_format": output_format, "results": results }))
}

async fn list_documents(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    params: &Value,
) -> Result<Value, ToolError> {
    use corpora_catalog::DocumentFilter;

    let status = match params.get("status").and_then(Value::as_str) {
        Some("processing") => Some(DocumentStatus::Processing),
        Some("completed") => Some(DocumentStatus::Completed),
        Some("failed") => Some(DocumentStatus::Failed),
        Some(other) => return Err(invalid_params(format!("unknown status '{other}'"))),
        None => None,
    };
    let doc_type = match params.get("doc_type").and_then(Value::as_str) {
        Some("pdf") => Some(DocType::Pdf),
        Some("txt") => Some(DocType::Txt),
        Some("html") => Some(DocType::Html),
        Some("md") => Some(DocType::Md),
        Some(other) => return Err(invalid_params(format!("unknown doc_type '{other}'"))),
        None => None,
    };
    let page = params.get("page").and_then(Value::as_i64).unwrap_or(1).max(1);
    let limit = clamped_u64(params, "limit", 50, 1, 100) as i64;

    let docs = state
        .orchestrator
        .list_documents(tenant_id, &DocumentFilter { status, doc_type }, page, limit)
        .await?;
    Ok(json!({ "documents": docs, "page": page, "limit": limit }))
}

async fn get_document(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    params: &Value,
) -> Result<Value, ToolError> {
    let id = parse_document_id(required_str(params, "document_id")?)?;
    let doc = state
        .orchestrator
        .get_document(tenant_id, id)
        .await?
        .ok_or_else(|| not_found("document not found"))?;
    Ok(json!({ "document": doc }))
}

async fn get_stats(state: &Arc<AppState>, tenant_id: TenantId) -> Result<Value, ToolError> {
    let stats = state.orchestrator.stats(tenant_id).await?;
    let usage = state.usage.summary(tenant_id).await?;
    Ok(json!({
        "documents": {
            "total": stats.total,
            "by_status": stats.by_status,
            "by_type": stats.by_type,
        },
        "usage": usage.into_iter().map(|(metric_type, total_value, total_cost_usd)| json!({
            "metric_type": metric_type,
            "total_value": total_value,
            "total_cost_usd": total_cost_usd,
        })).collect::<Vec<_>>()
    }))
}

const DEFAULT_SAMPLE_SIZE: i64 = 5;

/// Evenly-spaced indices across `[0, chunk_count)`, deduplicated and
/// sorted, so a document with fewer chunks than the requested sample size
/// returns exactly `chunk_count` distinct samples (spec §8 boundary).
fn sample_indices(chunk_count: i64, sample_size: i64) -> Vec<i32> {
    if chunk_count <= 0 {
        return Vec::new();
    }
    let n = sample_size.min(chunk_count);
    let mut indices: Vec<i32> = (0..n)
        .map(|i| {
            if n <= 1 {
                0
            } else {
                ((i * (chunk_count - 1)) / (n - 1)) as i32
            }
        })
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

async fn get_document_overview(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    params: &Value,
) -> Result<Value, ToolError> {
    let id = parse_document_id(required_str(params, "document_id")?)?;
    let sample_size = params
        .get("sample_size")
        .and_then(Value::as_i64)
        .unwrap_or(DEFAULT_SAMPLE_SIZE)
        .clamp(3, 10);

    let doc = state
        .orchestrator
        .get_document(tenant_id, id)
        .await?
        .ok_or_else(|| not_found("document not found"))?;

    let mut samples = Vec::new();
    for index in sample_indices(i64::from(doc.chunk_count), sample_size) {
        let rows = state
            .vector
            .get_chunk_range(tenant_id, id, index, index)
            .await?;
        samples.extend(rows);
    }

    Ok(json!({ "document": doc, "sample_chunks": samples }))
}

async fn compare_documents(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    params: &Value,
) -> Result<Value, ToolError> {
    let query = required_str(params, "query")?;
    let raw_ids = params
        .get("document_ids")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid_params("missing or invalid 'document_ids'"))?;
    if raw_ids.len() < 2 || raw_ids.len() > 10 {
        return Err(invalid_params("document_ids must contain between 2 and 10 entries"));
    }
    let mut document_ids = Vec::with_capacity(raw_ids.len());
    for raw in raw_ids {
        let s = raw
            .as_str()
            .ok_or_else(|| invalid_params("document_ids entries must be strings"))?;
        document_ids.push(parse_document_id(s)?);
    }
    let results_per_document = clamped_u64(params, "results_per_document", 3, 1, 10) as usize;

    let mut per_document = Vec::with_capacity(document_ids.len());
    for id in document_ids {
        let doc = state
            .orchestrator
            .get_document(tenant_id, id)
            .await?
            .ok_or_else(|| not_found(format!("document {id} not found")))?;
        let passages = ranked_passages(
            state,
            tenant_id,
            query,
            results_per_document,
            0.0,
            Some(id),
            0,
        )
        .await?;
        per_document.push(json!({ "document": doc, "passages": passages }));
    }

    Ok(json!({ "results": per_document }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_indices_are_dense_when_chunk_count_below_sample_size() {
        assert_eq!(sample_indices(3, 5), vec![0, 1, 2]);
    }

    #[test]
    fn sample_indices_span_the_full_range() {
        let idx = sample_indices(100, 5);
        assert_eq!(idx.first(), Some(&0));
        assert_eq!(idx.last(), Some(&99));
        assert_eq!(idx.len(), 5);
    }

    #[test]
    fn sample_indices_empty_document_yields_nothing() {
        assert!(sample_indices(0, 5).is_empty());
    }
}
