//! Row types returned by the catalog repository functions.

use chrono::{DateTime, Utc};
use corpora_core::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    PendingVerification,
    Active,
    Suspended,
    Deleted,
}

impl TenantStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingVerification => "pending_verification",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            "deleted" => Self::Deleted,
            _ => Self::PendingVerification,
        }
    }
}

/// A tenant row. Secret fields are the AEAD ciphertext blobs from spec §4.1,
/// never plaintext.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: TenantId,
    pub email: String,
    pub company_name: Option<String>,
    pub password_hash: String,
    pub jwt_secret_enc: String,
    pub jwt_refresh_secret_enc: String,
    pub embedder_api_key_enc: Option<String>,
    pub api_key: String,
    pub status: TenantStatus,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub tenant_id: TenantId,
    pub rate_limit_per_minute: i32,
    pub rate_limit_per_day: i32,
    pub max_documents: i32,
    pub max_file_size_mb: i32,
    pub allowed_doc_types: Vec<String>,
    pub chunk_size: i32,
    pub chunk_overlap: i32,
    pub embedding_model: String,
    pub monthly_budget_usd: f64,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            tenant_id: TenantId::from_uuid(Uuid::nil()),
            rate_limit_per_minute: 60,
            rate_limit_per_day: 10_000,
            max_documents: 10_000,
            max_file_size_mb: 50,
            allowed_doc_types: vec!["pdf", "txt", "html", "md"]
                .into_iter()
                .map(String::from)
                .collect(),
            chunk_size: 1000,
            chunk_overlap: 200,
            embedding_model: "small".to_string(),
            monthly_budget_usd: 100.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshTokenRow {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

#[derive(Debug, Clone)]
pub struct EmailVerificationRow {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
