//! Email verification state machine storage (spec §3 `EmailVerification`,
//! §4.8).

use crate::error::{map_pg_error, map_pool_error};
use crate::models::EmailVerificationRow;
use crate::tenants::TenantRepo;
use chrono::{DateTime, Duration, Utc};
use corpora_core::{CoreError, TenantId};
use deadpool_postgres::Pool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EmailVerificationRepo {
    pool: Pool,
}

fn row_to_verification(row: &tokio_postgres::Row) -> EmailVerificationRow {
    let id: Uuid = row.get("id");
    let tenant_id: Uuid = row.get("customer_id");
    EmailVerificationRow {
        id,
        tenant_id: TenantId::from_uuid(tenant_id),
        token: row.get("token"),
        expires_at: row.get("expires_at"),
        verified_at: row.get("verified_at"),
        created_at: row.get("created_at"),
    }
}

pub enum VerifyOutcome {
    Verified,
    AlreadyVerified,
    Expired,
    NotFound,
}

impl EmailVerificationRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Issue a new 64-hex-char token with a 24h TTL (spec §4.8). Idempotent
    /// per tenant in the sense that multiple unverified rows may coexist;
    /// the latest one wins on lookup.
    pub async fn issue(
        &self,
        tenant_id: TenantId,
        token: &str,
        issuer_ip: Option<&str>,
        issuer_agent: Option<&str>,
    ) -> Result<EmailVerificationRow, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let expires_at = Utc::now() + Duration::hours(24);
        let row = client
            .query_one(
                "INSERT INTO email_verifications
                    (id, customer_id, token, expires_at, issuer_ip, issuer_agent)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING *",
                &[
                    &Uuid::new_v4(),
                    &tenant_id.0,
                    &token,
                    &expires_at,
                    &issuer_ip,
                    &issuer_agent,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row_to_verification(&row))
    }

    /// Count verification attempts issued for `tenant_id` in the last rolling
    /// hour (spec §4.8 resend rate limit).
    pub async fn attempts_in_last_hour(&self, tenant_id: TenantId) -> Result<i64, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let since = Utc::now() - Duration::hours(1);
        let row = client
            .query_one(
                "SELECT count(*) FROM email_verifications WHERE customer_id = $1 AND created_at >= $2",
                &[&tenant_id.0, &since],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.get(0))
    }

    /// Timestamp of the most recent attempt, used to compute `retry_after`.
    pub async fn latest_attempt_at(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<DateTime<Utc>>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT created_at FROM email_verifications WHERE customer_id = $1
                 ORDER BY created_at DESC LIMIT 1",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.map(|r| r.get(0)))
    }

    /// Verify a presented token (spec §4.8). Performs tenant activation and
    /// the verification-row update in one transaction.
    pub async fn verify(
        &self,
        tenant_repo: &TenantRepo,
        token: &str,
    ) -> Result<VerifyOutcome, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM email_verifications WHERE token = $1 ORDER BY created_at DESC LIMIT 1",
                &[&token],
            )
            .await
            .map_err(map_pg_error)?;

        let Some(row) = row else {
            return Ok(VerifyOutcome::NotFound);
        };
        let record = row_to_verification(&row);

        let tenant = tenant_repo.find_by_id(record.tenant_id).await?;
        let already_verified = tenant.as_ref().is_some_and(|t| t.email_verified);

        if record.verified_at.is_some() || already_verified {
            return Ok(VerifyOutcome::AlreadyVerified);
        }

        if Utc::now() > record.expires_at {
            return Ok(VerifyOutcome::Expired);
        }

        let mut client = self.pool.get().await.map_err(map_pool_error)?;
        let txn = client.transaction().await.map_err(map_pg_error)?;
        txn.execute(
            "UPDATE email_verifications SET verified_at = now() WHERE id = $1",
            &[&record.id],
        )
        .await
        .map_err(map_pg_error)?;
        txn.execute(
            "UPDATE customers SET email_verified = true, status = 'active', updated_at = now()
             WHERE id = $1",
            &[&record.tenant_id.0],
        )
        .await
        .map_err(map_pg_error)?;
        txn.commit().await.map_err(map_pg_error)?;

        Ok(VerifyOutcome::Verified)
    }
}
