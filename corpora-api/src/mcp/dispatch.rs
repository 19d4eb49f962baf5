//! Method routing for a single JSON-RPC request, shared by both MCP
//! transports (spec §4.10). `initialize`/`ping`/`tools/list`/`tools/call`
//! return a response; the `notifications/*` methods never do.

use super::protocol::{JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND};
use super::tools::{self, TOOLS};
use crate::state::AppState;
use corpora_core::TenantId;
use serde_json::{json, Value};
use std::sync::Arc;

const PROTOCOL_VERSION: &str = "2024-11-05";

fn tool_catalog() -> Value {
    json!(TOOLS
        .iter()
        .map(|t| json!({
            "name": t.name,
            "description": t.description,
            "inputSchema": (t.input_schema)(),
        }))
        .collect::<Vec<_>>())
}

/// Dispatch one request. Returns `None` for notifications (no `id`), which
/// callers must not emit a response frame for.
pub async fn dispatch(state: &Arc<AppState>, tenant_id: TenantId, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let id = match &req.id {
        Some(id) => id.clone(),
        None => {
            // Notifications: acknowledge locally (e.g. client cancellation)
            // and never reply.
            match req.method.as_str() {
                "notifications/initialized" => tracing::debug!(tenant_id = %tenant_id, "mcp session initialized"),
                "notifications/cancelled" => tracing::debug!(tenant_id = %tenant_id, "mcp request cancelled"),
                other => tracing::debug!(tenant_id = %tenant_id, method = other, "unhandled mcp notification"),
            }
            return None;
        }
    };

    let response = match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": "corpora", "version": env!("CARGO_PKG_VERSION") },
            }),
        ),
        "ping" => JsonRpcResponse::ok(id, json!({})),
        "tools/list" => JsonRpcResponse::ok(id, json!({ "tools": tool_catalog() })),
        "tools/call" => handle_tools_call(state, tenant_id, id, &req.params).await,
        other => JsonRpcResponse::err(id, METHOD_NOT_FOUND, format!("unknown method '{other}'")),
    };

    Some(response)
}

async fn handle_tools_call(
    state: &Arc<AppState>,
    tenant_id: TenantId,
    id: Value,
    params: &Value,
) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::err(id, INVALID_PARAMS, "missing 'name'");
    };
    let tool_params = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match tools::call(state, tenant_id, name, &tool_params).await {
        Ok(result) => JsonRpcResponse::ok(
            id,
            json!({
                "content": [{ "type": "text", "text": result.to_string() }],
                "isError": false,
            }),
        ),
        Err(e) => JsonRpcResponse::err(id, e.code, e.message),
    }
}
