//! The two MCP transports (spec §4.10):
//!
//! - Streamable HTTP: `POST /mcp` with a single JSON-RPC object or a batch
//!   array; notifications get a bare 202, everything else gets the
//!   response(s) back in the same HTTP response.
//! - SSE: `GET /mcp` opens a stream, sends an `endpoint` event naming the
//!   `POST /mcp/message?session_id=...` URL the client must then use; every
//!   response to those POSTs is delivered as an `event: message` frame on
//!   the original stream rather than in the POST's own response.

use super::dispatch::dispatch;
use super::protocol::{JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};
use crate::error::ApiError;
use crate::middleware::Authed;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use corpora_core::CoreError;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::UnboundedReceiverStream;

async fn run_one(state: &Arc<AppState>, tenant_id: corpora_core::TenantId, raw: Value) -> Option<JsonRpcResponse> {
    match serde_json::from_value::<JsonRpcRequest>(raw) {
        Ok(req) => dispatch(state, tenant_id, req).await,
        Err(e) => Some(JsonRpcResponse::err(Value::Null, PARSE_ERROR, e.to_string())),
    }
}

/// `POST /mcp` (Streamable HTTP).
pub async fn post_mcp(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Json(body): Json<Value>,
) -> Response {
    let responses: Vec<JsonRpcResponse> = match body {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(resp) = run_one(&state, tenant.tenant_id, item).await {
                    out.push(resp);
                }
            }
            out
        }
        Value::Object(_) => run_one(&state, tenant.tenant_id, body).await.into_iter().collect(),
        _ => {
            return ApiError::from(CoreError::validation(
                "request body must be a JSON-RPC object or batch array",
            ))
            .into_response()
        }
    };

    if responses.is_empty() {
        axum::http::StatusCode::ACCEPTED.into_response()
    } else if responses.len() == 1 {
        Json(responses.into_iter().next().unwrap()).into_response()
    } else {
        Json(responses).into_response()
    }
}

/// `GET /mcp` (SSE).
pub async fn get_mcp(
    State(state): State<Arc<AppState>>,
    Extension(_tenant): Extension<Authed>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let rx = state.mcp_sessions.register(session_id.clone());

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/mcp/message?session_id={session_id}"));
    let messages = UnboundedReceiverStream::new(rx)
        .map(|payload| Ok(Event::default().event("message").data(payload)));
    let initial = futures::stream::once(async move { Ok(endpoint) });

    let sessions = state.mcp_sessions.clone();
    let guard = SessionGuard {
        id: session_id,
        sessions,
    };
    let body = initial.chain(messages);
    let stream = futures::stream::unfold((Some(guard), Box::pin(body)), |(guard, mut s)| async move {
        s.next().await.map(|item| (item, (guard, s)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

struct SessionGuard {
    id: String,
    sessions: Arc<super::session::McpSessions>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
    }
}

#[derive(serde::Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

/// `POST /mcp/message?session_id=...` — the POST-target named by the
/// `endpoint` SSE event. Responses are delivered twice (spec §4.10): once
/// here, in the POST's own response, and once duplicated as `event:
/// message` frames on the open SSE stream.
pub async fn post_mcp_message(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Query(q): Query<SessionQuery>,
    Json(body): Json<Value>,
) -> Response {
    let responses: Vec<JsonRpcResponse> = match body {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(resp) = run_one(&state, tenant.tenant_id, item).await {
                    out.push(resp);
                }
            }
            out
        }
        Value::Object(_) => run_one(&state, tenant.tenant_id, body).await.into_iter().collect(),
        _ => {
            return ApiError::from(CoreError::validation(
                "request body must be a JSON-RPC object or batch array",
            ))
            .into_response()
        }
    };

    for resp in &responses {
        let payload = serde_json::to_string(resp).unwrap_or_default();
        if !state.mcp_sessions.send(&q.session_id, payload) {
            return axum::http::StatusCode::NOT_FOUND.into_response();
        }
    }

    if responses.is_empty() {
        axum::http::StatusCode::ACCEPTED.into_response()
    } else if responses.len() == 1 {
        Json(responses.into_iter().next().unwrap()).into_response()
    } else {
        Json(responses).into_response()
    }
}
