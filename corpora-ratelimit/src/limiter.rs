//! Sliding-window per-tenant rate limiting (spec §4.9, C9).
//!
//! Two rolling windows — last 60s, last 24h — are checked on every
//! authenticated request. The minute bucket is the one actually written to;
//! the day window is a pure read over the same table.

use chrono::{Duration, Utc};
use corpora_catalog::rate_limit::minute_aligned;
use corpora_catalog::RateLimitRepo;
use corpora_core::{CoreError, Metrics, TenantId};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub per_minute: i64,
    pub per_day: i64,
}

/// The outcome of a rate-limit check, already shaped for the `X-RateLimit-*`
/// response headers (spec §4.9 step 4).
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: i64,
    pub limit: i64,
    pub reset_epoch: i64,
    pub retry_after_secs: Option<u64>,
}

#[derive(Clone)]
pub struct RateLimiter {
    repo: RateLimitRepo,
    metrics: Arc<Metrics>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(repo: RateLimitRepo, metrics: Arc<Metrics>) -> Self {
        Self { repo, metrics }
    }

    /// Spec §4.9 steps 1-3: sum both windows, reject if either is exceeded,
    /// otherwise upsert the current-minute bucket.
    pub async fn check(
        &self,
        tenant_id: TenantId,
        endpoint: &str,
        limits: RateLimits,
    ) -> Result<RateLimitDecision, CoreError> {
        let now = Utc::now();
        let minute_ago = now - Duration::seconds(60);
        let day_ago = now - Duration::hours(24);

        let per_minute_count = self.repo.count_since(tenant_id, endpoint, minute_ago).await?;
        let per_day_count = self.repo.count_since(tenant_id, endpoint, day_ago).await?;
        let window_start = minute_aligned(now);
        let reset = window_start + Duration::minutes(1);

        if per_minute_count >= limits.per_minute || per_day_count >= limits.per_day {
            self.metrics.inc_rate_limit_rejections();
            let retry_after_secs = (reset - now).num_seconds().clamp(0, 60) as u64;
            return Ok(RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit: limits.per_minute,
                reset_epoch: reset.timestamp(),
                retry_after_secs: Some(retry_after_secs),
            });
        }

        let new_count = self
            .repo
            .increment_current_minute(tenant_id, endpoint, now)
            .await?;
        let remaining = (limits.per_minute - i64::from(new_count)).max(0);
        Ok(RateLimitDecision {
            allowed: true,
            remaining,
            limit: limits.per_minute,
            reset_epoch: reset.timestamp(),
            retry_after_secs: None,
        })
    }
}
