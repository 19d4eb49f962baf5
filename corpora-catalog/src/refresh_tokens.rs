//! Refresh token storage and rotation (spec §3 `RefreshToken`, §4.8, §9).
//!
//! Only `sha256(token)` is ever persisted. Rotation takes a row-level lock
//! (`SELECT ... FOR UPDATE`) on the presented token's hash row so two
//! concurrent callers presenting the same stolen token cannot both succeed
//! (spec §9 "Dual ownership in refresh flow").

use crate::error::{map_pg_error, map_pool_error};
use crate::models::RefreshTokenRow;
use chrono::{Duration, Utc};
use corpora_core::{CoreError, TenantId};
use deadpool_postgres::Pool;
use uuid::Uuid;

#[derive(Clone)]
pub struct RefreshTokenRepo {
    pool: Pool,
}

fn row_to_refresh(row: &tokio_postgres::Row) -> RefreshTokenRow {
    let id: Uuid = row.get("id");
    let tenant_id: Uuid = row.get("customer_id");
    RefreshTokenRow {
        id,
        tenant_id: TenantId::from_uuid(tenant_id),
        token_hash: row.get("token_hash"),
        expires_at: row.get("expires_at"),
        revoked: row.get("revoked"),
    }
}

impl RefreshTokenRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        tenant_id: TenantId,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<RefreshTokenRow, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let expires_at = Utc::now() + ttl;
        let row = client
            .query_one(
                "INSERT INTO refresh_tokens (id, customer_id, token_hash, expires_at)
                 VALUES ($1, $2, $3, $4) RETURNING *",
                &[&Uuid::new_v4(), &tenant_id.0, &token_hash, &expires_at],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row_to_refresh(&row))
    }

    /// Rotate: within one transaction, lock the presented hash row, verify it
    /// is valid (present, not revoked, not expired), mark it revoked, and
    /// insert the replacement row. Returns `None` if the presented hash is
    /// missing, revoked, or expired.
    pub async fn rotate(
        &self,
        token_hash: &str,
        new_token_hash: &str,
        ttl: Duration,
    ) -> Result<Option<RefreshTokenRow>, CoreError> {
        let mut client = self.pool.get().await.map_err(map_pool_error)?;
        let txn = client.transaction().await.map_err(map_pg_error)?;

        let row = txn
            .query_opt(
                "SELECT * FROM refresh_tokens WHERE token_hash = $1 FOR UPDATE",
                &[&token_hash],
            )
            .await
            .map_err(map_pg_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let existing = row_to_refresh(&row);

        if existing.revoked || Utc::now() > existing.expires_at {
            return Ok(None);
        }

        txn.execute(
            "UPDATE refresh_tokens SET revoked = true WHERE id = $1",
            &[&existing.id],
        )
        .await
        .map_err(map_pg_error)?;

        let expires_at = Utc::now() + ttl;
        let new_row = txn
            .query_one(
                "INSERT INTO refresh_tokens (id, customer_id, token_hash, expires_at)
                 VALUES ($1, $2, $3, $4) RETURNING *",
                &[&Uuid::new_v4(), &existing.tenant_id.0, &new_token_hash, &expires_at],
            )
            .await
            .map_err(map_pg_error)?;

        txn.commit().await.map_err(map_pg_error)?;
        Ok(Some(row_to_refresh(&new_row)))
    }

    /// A token is valid iff the hash is present, not revoked, and not expired
    /// (spec §3 invariant).
    pub async fn is_valid(&self, token_hash: &str) -> Result<Option<RefreshTokenRow>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM refresh_tokens WHERE token_hash = $1 AND revoked = false AND expires_at > now()",
                &[&token_hash],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_refresh))
    }

    pub async fn revoke_one(&self, token_hash: &str) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE refresh_tokens SET revoked = true WHERE token_hash = $1",
                &[&token_hash],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    pub async fn revoke_all(&self, tenant_id: TenantId) -> Result<u64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let affected = client
            .execute(
                "UPDATE refresh_tokens SET revoked = true WHERE customer_id = $1 AND revoked = false",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(affected)
    }

    /// Periodic sweep: remove rows past expiry (spec §4.8).
    pub async fn sweep_expired(&self) -> Result<u64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let affected = client
            .execute(
                "DELETE FROM refresh_tokens WHERE expires_at < now()",
                &[],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(affected)
    }
}
