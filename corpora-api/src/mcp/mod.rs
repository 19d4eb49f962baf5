//! MCP tool surface (spec §4.10, §6.3): JSON-RPC 2.0 over two transports,
//! authenticated by tenant API key rather than JWT. Mounted under `/mcp`.

pub mod dispatch;
pub mod protocol;
pub mod session;
pub mod tools;
pub mod transport;

use crate::middleware::api_key_auth_then_rate_limit;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/mcp", post(transport::post_mcp).get(transport::get_mcp))
        .route("/mcp/message", post(transport::post_mcp_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_auth_then_rate_limit,
        ))
        .with_state(state)
}
