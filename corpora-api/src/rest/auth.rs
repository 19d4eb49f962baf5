//! `/api/auth/*` handlers (spec §6.2). Signup, login, refresh, and
//! verification run unauthenticated by construction; `logout-all` is the
//! one route here that needs a resolved tenant, via
//! [`crate::middleware::Authed`].

use crate::error::ApiError;
use crate::middleware::Authed;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use corpora_core::CoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub company_name: Option<String>,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub tenant_id: String,
    pub email: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let tenant = state
        .auth
        .signup(&req.email, &req.password, req.company_name)
        .await?;
    Ok(Json(SignupResponse {
        tenant_id: tenant.id.to_string(),
        email: tenant.email,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<corpora_auth::TokenPair>, ApiError> {
    let (_, pair) = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(pair))
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<corpora_auth::TokenPair>, ApiError> {
    let pair = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(pair))
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    state.auth.logout(&req.refresh_token).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct MeResponse {
    pub tenant_id: String,
    pub email: String,
    pub company_name: Option<String>,
    pub status: corpora_catalog::TenantStatus,
    pub email_verified: bool,
    pub embedder_key_configured: bool,
}

/// `GET /api/auth/me`.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<Json<MeResponse>, ApiError> {
    let t = state
        .tenants
        .find_by_id(tenant.tenant_id)
        .await?
        .ok_or_else(|| CoreError::not_found("tenant not found"))?;
    Ok(Json(MeResponse {
        tenant_id: t.id.to_string(),
        email: t.email,
        company_name: t.company_name,
        status: t.status,
        email_verified: t.email_verified,
        embedder_key_configured: t.embedder_api_key_enc.is_some(),
    }))
}

pub async fn logout_all(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let revoked = state.auth.logout_all(tenant.tenant_id).await?;
    Ok(Json(serde_json::json!({ "revoked": revoked })))
}

#[derive(Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Query(q): Query<VerifyEmailQuery>,
) -> Result<axum::http::StatusCode, ApiError> {
    state.auth.verify_email(&q.token).await?;
    Ok(axum::http::StatusCode::OK)
}

#[derive(Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendVerificationRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    state.auth.resend_verification(&req.email).await?;
    Ok(axum::http::StatusCode::ACCEPTED)
}
