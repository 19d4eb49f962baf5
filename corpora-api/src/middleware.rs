//! The auth-then-rate-limit pipeline every authenticated request runs
//! through exactly once, at the edge (spec §4.10, §4.9 step 4). Verifying
//! the bearer credential here — rather than again inside each handler —
//! means the JWT or API key is checked a single time per request and the
//! resolved tenant is handed to the handler as an [`axum::Extension`].

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use corpora_core::{CoreError, TenantId, UsageMetric, UsageMetricType};
use corpora_ratelimit::RateLimits;
use std::sync::Arc;

/// The tenant identity resolved by [`auth_then_rate_limit`], attached to
/// the request so handlers can pull it out with `Extension<Authed>`.
#[derive(Clone)]
pub struct Authed {
    pub tenant_id: TenantId,
    pub email: Option<String>,
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ApiError(CoreError::Auth {
                message: "missing or malformed bearer token".to_string(),
            })
        })
}

/// REST surface: bearer is a tenant JWT access token.
pub async fn jwt_auth_then_rate_limit(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Ok(t) => t.to_string(),
        Err(e) => return e.into_response(),
    };
    let (tenant_id, email) = match state.auth.verify_access_token(&token).await {
        Ok(v) => v,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let endpoint = req.uri().path().to_string();
    match rate_limit_headers(&state, tenant_id, &endpoint).await {
        Ok(headers) => {
            req.extensions_mut().insert(Authed {
                tenant_id,
                email: Some(email),
            });
            let mut resp = next.run(req).await;
            resp.headers_mut().extend(headers);
            resp
        }
        Err(e) => e.into_response(),
    }
}

/// MCP surface: bearer is the tenant's stable API key.
pub async fn api_key_auth_then_rate_limit(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Ok(t) => t.to_string(),
        Err(e) => return e.into_response(),
    };
    let tenant = match state.tenants.find_by_api_key(&token).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return ApiError::from(CoreError::Auth {
                message: "invalid api key".to_string(),
            })
            .into_response()
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    let endpoint = req.uri().path().to_string();
    match rate_limit_headers(&state, tenant.id, &endpoint).await {
        Ok(headers) => {
            req.extensions_mut().insert(Authed {
                tenant_id: tenant.id,
                email: None,
            });
            let mut resp = next.run(req).await;
            resp.headers_mut().extend(headers);
            resp
        }
        Err(e) => e.into_response(),
    }
}

async fn rate_limit_headers(
    state: &AppState,
    tenant_id: TenantId,
    endpoint: &str,
) -> Result<axum::http::HeaderMap, ApiError> {
    let config = state.tenants.config_for(tenant_id).await?;
    let limits = RateLimits {
        per_minute: i64::from(config.rate_limit_per_minute),
        per_day: i64::from(config.rate_limit_per_day),
    };
    let decision = state.rate_limiter.check(tenant_id, endpoint, limits).await?;
    if !decision.allowed {
        return Err(CoreError::RateLimited {
            retry_after_secs: decision.retry_after_secs.unwrap_or(60),
        }
        .into());
    }

    let mut metric = UsageMetric::new(tenant_id, UsageMetricType::ApiCall, 1.0);
    metric.metadata = serde_json::json!({ "endpoint": endpoint });
    state.usage.record_async(metric);

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        "x-ratelimit-limit",
        decision.limit.to_string().parse().unwrap(),
    );
    headers.insert(
        "x-ratelimit-remaining",
        decision.remaining.to_string().parse().unwrap(),
    );
    headers.insert(
        "x-ratelimit-reset",
        decision.reset_epoch.to_string().parse().unwrap(),
    );
    Ok(headers)
}
