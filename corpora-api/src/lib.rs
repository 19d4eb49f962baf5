//! HTTP/JSON-RPC dispatcher (spec §4.10, C10): the only process boundary
//! between tenants and the rest of the system. Two surfaces share one
//! [`AppState`] — REST under `/api`, MCP tools under `/mcp` — and every
//! authenticated route runs through [`middleware::jwt_auth_then_rate_limit`]
//! or [`middleware::api_key_auth_then_rate_limit`] exactly once, at the edge.

pub mod error;
pub mod mcp;
pub mod middleware;
pub mod rest;
pub mod state;

pub use state::AppState;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full router: `/api/*` REST, `/mcp*` JSON-RPC, plus
/// operational endpoints that need no tenant auth.
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api", rest::router(state.clone()))
        .merge(mcp::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
