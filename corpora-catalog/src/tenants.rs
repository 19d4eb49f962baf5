//! Tenant and tenant-config repository (spec §3 `customer`, §4.2).

use crate::error::{map_pg_error, map_pool_error};
use crate::models::{Tenant, TenantConfig, TenantStatus};
use corpora_core::{CoreError, TenantId};
use deadpool_postgres::Pool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TenantRepo {
    pool: Pool,
}

fn row_to_tenant(row: &tokio_postgres::Row) -> Tenant {
    let id: Uuid = row.get("id");
    Tenant {
        id: TenantId::from_uuid(id),
        email: row.get("email"),
        company_name: row.get("company_name"),
        password_hash: row.get("password_hash"),
        jwt_secret_enc: row.get("jwt_secret_enc"),
        jwt_refresh_secret_enc: row.get("jwt_refresh_secret_enc"),
        embedder_api_key_enc: row.get("embedder_api_key_enc"),
        api_key: row.get("api_key"),
        status: TenantStatus::parse(row.get("status")),
        email_verified: row.get("email_verified"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_config(row: &tokio_postgres::Row) -> TenantConfig {
    let id: Uuid = row.get("customer_id");
    TenantConfig {
        tenant_id: TenantId::from_uuid(id),
        rate_limit_per_minute: row.get("rate_limit_per_minute"),
        rate_limit_per_day: row.get("rate_limit_per_day"),
        max_documents: row.get("max_documents"),
        max_file_size_mb: row.get("max_file_size_mb"),
        allowed_doc_types: row.get("allowed_doc_types"),
        chunk_size: row.get("chunk_size"),
        chunk_overlap: row.get("chunk_overlap"),
        embedding_model: row.get("embedding_model"),
        monthly_budget_usd: row.get("monthly_budget_usd"),
    }
}

/// Fields needed to create a new tenant, already hashed/encrypted by the
/// caller (this repo never sees plaintext passwords or secrets).
pub struct NewTenant {
    pub email: String,
    pub company_name: Option<String>,
    pub password_hash: String,
    pub jwt_secret_enc: String,
    pub jwt_refresh_secret_enc: String,
    pub api_key: String,
}

impl TenantRepo {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a tenant plus its default config in one transaction (spec §4.2:
    /// "signup creates tenant + config").
    pub async fn create(&self, new: NewTenant) -> Result<Tenant, CoreError> {
        let mut client = self.pool.get().await.map_err(map_pool_error)?;
        let txn = client.transaction().await.map_err(map_pg_error)?;

        let id = Uuid::new_v4();
        let row = txn
            .query_one(
                "INSERT INTO customers
                    (id, email, company_name, password_hash, jwt_secret_enc,
                     jwt_refresh_secret_enc, api_key, status, email_verified)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending_verification', false)
                 RETURNING *",
                &[
                    &id,
                    &new.email,
                    &new.company_name,
                    &new.password_hash,
                    &new.jwt_secret_enc,
                    &new.jwt_refresh_secret_enc,
                    &new.api_key,
                ],
            )
            .await
            .map_err(map_pg_error)?;

        txn.execute(
            "INSERT INTO customer_config (customer_id) VALUES ($1)",
            &[&id],
        )
        .await
        .map_err(map_pg_error)?;

        txn.commit().await.map_err(map_pg_error)?;
        Ok(row_to_tenant(&row))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Tenant>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM customers WHERE email = $1 AND deleted_at IS NULL",
                &[&email],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_tenant))
    }

    pub async fn find_by_id(&self, id: TenantId) -> Result<Option<Tenant>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM customers WHERE id = $1 AND deleted_at IS NULL",
                &[&id.0],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_tenant))
    }

    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Tenant>, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM customers WHERE api_key = $1 AND deleted_at IS NULL",
                &[&api_key],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(row.as_ref().map(row_to_tenant))
    }

    pub async fn config_for(&self, tenant_id: TenantId) -> Result<TenantConfig, CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        let row = client
            .query_opt(
                "SELECT * FROM customer_config WHERE customer_id = $1",
                &[&tenant_id.0],
            )
            .await
            .map_err(map_pg_error)?;
        row.as_ref()
            .map(row_to_config)
            .ok_or_else(|| CoreError::not_found("tenant config not found"))
    }

    pub async fn set_status(&self, tenant_id: TenantId, status: TenantStatus) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE customers SET status = $2, updated_at = now() WHERE id = $1",
                &[&tenant_id.0, &status.as_str()],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    pub async fn set_embedder_key(
        &self,
        tenant_id: TenantId,
        key_enc: Option<&str>,
    ) -> Result<(), CoreError> {
        let client = self.pool.get().await.map_err(map_pool_error)?;
        client
            .execute(
                "UPDATE customers SET embedder_api_key_enc = $2, updated_at = now() WHERE id = $1",
                &[&tenant_id.0, &key_enc],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }
}
