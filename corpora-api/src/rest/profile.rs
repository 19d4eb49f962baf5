//! `/api/profile/*` handlers (spec §6.2, §4.11 "fall back to platform key
//! if absent"): let a tenant bring its own embedder API key.

use crate::error::ApiError;
use crate::middleware::Authed;
use crate::state::AppState;
use axum::{Extension, Json};
use axum::extract::State;
use corpora_core::CoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct EmbedderKeyStatus {
    pub configured: bool,
}

/// `GET /api/profile/embedder-key` — never returns the key itself, only
/// whether one is set.
pub async fn get_embedder_key_status(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<Json<EmbedderKeyStatus>, ApiError> {
    let t = state
        .tenants
        .find_by_id(tenant.tenant_id)
        .await?
        .ok_or_else(|| CoreError::not_found("tenant not found"))?;
    Ok(Json(EmbedderKeyStatus {
        configured: t.embedder_api_key_enc.is_some(),
    }))
}

#[derive(Deserialize)]
pub struct SetEmbedderKeyRequest {
    pub api_key: String,
}

/// `PUT /api/profile/embedder-key`.
pub async fn set_embedder_key(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
    Json(req): Json<SetEmbedderKeyRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    if req.api_key.trim().is_empty() {
        return Err(CoreError::validation("api_key must not be empty").into());
    }
    state
        .auth
        .set_embedder_key(tenant.tenant_id, Some(&req.api_key))
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// `DELETE /api/profile/embedder-key` — tenant reverts to the platform key.
pub async fn remove_embedder_key(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<axum::http::StatusCode, ApiError> {
    state.auth.set_embedder_key(tenant.tenant_id, None).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
