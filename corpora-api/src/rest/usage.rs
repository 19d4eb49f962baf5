//! `/api/usage` handler (spec §4.9, §6.2): a per-tenant summary of usage
//! metrics, grouped by metric type.

use crate::error::ApiError;
use crate::middleware::Authed;
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct UsageSummaryItem {
    pub metric_type: String,
    pub total_value: f64,
    pub total_cost_usd: f64,
}

/// `GET /api/usage`.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(tenant): Extension<Authed>,
) -> Result<Json<Vec<UsageSummaryItem>>, ApiError> {
    let rows = state.usage.summary(tenant.tenant_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(metric_type, total_value, total_cost_usd)| UsageSummaryItem {
                metric_type,
                total_value,
                total_cost_usd,
            })
            .collect(),
    ))
}
