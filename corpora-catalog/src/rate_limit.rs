//! Rate-limit window storage (spec §3 `RateLimitWindow`, §4.9, §9).
//!
//! Window start is always aligned to the 1-minute boundary (spec §9 open
//! question, resolved: the source did not align consistently; we do).

use crate::error::{map_pg_error, map_pool_error};
use chrono::{DateTime, Duration, DurationRound, Utc};
use corpora_core::{CoreError, TenantId};
use deadpool_postgres::Pool;

#[derive(Clone)]
pub struct RateLimitRepo {
    pool: Pool,
}

/// Floor `now` to the start of its minute.
#[must_use]
pub fn minute_aligned(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(Duration::minutes(1))
        .unwrap_or(now)
}

impl RateLimitRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Sum `request_count` for windows ending after `since` (spec §4.9 step
    /// 1).
    pub async fn count_since(
        &self,
        tenant_id: TenantId,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_one(
                "SELECT coalesce(sum(request_count), 0) FROM rate_limit_tracker
                 WHERE customer_id = $1 AND endpoint = $2 AND window_end > $3",
                &[&tenant_id.0, &endpoint, &since],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.get(0))
    }

    /// Upsert the current-minute bucket, incrementing `request_count` (spec
    /// §4.9 step 3).
    pub async fn increment_current_minute(
        &self,
        tenant_id: TenantId,
        endpoint: &str,
        now: DateTime<Utc>,
    ) -> Result<i32, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let window_start = minute_aligned(now);
        let window_end = window_start + Duration::minutes(1);
        let row = client
            .query_one(
                "INSERT INTO rate_limit_tracker (customer_id, endpoint, window_start, window_end, request_count)
                 VALUES ($1, $2, $3, $4, 1)
                 ON CONFLICT (customer_id, endpoint, window_start)
                 DO UPDATE SET request_count = rate_limit_tracker.request_count + 1
                 RETURNING request_count",
                &[&tenant_id.0, &endpoint, &window_start, &window_end],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.get(0))
    }

    /// Periodic prune of windows older than 24h (spec §3).
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let affected = client
            .execute(
                "DELETE FROM rate_limit_tracker WHERE window_end < $1",
                &[&cutoff],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(affected)
    }
}
