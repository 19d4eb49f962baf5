//! Tenant auth & token engine (spec §4.8, C8): signup, login, refresh
//! rotation, revocation, and the email-verification state machine.

use crate::email::EmailSender;
use crate::secrets::{self, TenantSecretPair};
use crate::tokens;
use chrono::{Duration, Utc};
use corpora_catalog::{
    EmailVerificationRepo, NewTenant, RefreshTokenRepo, Tenant, TenantRepo, TenantStatus,
    VerifyOutcome,
};
use corpora_core::{CoreError, TenantId};
use corpora_crypto::aead::MasterKey;
use corpora_crypto::{password, token as token_gen};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub resend_limit_per_hour: i64,
    pub frontend_url: String,
}

impl AuthConfig {
    /// Load from `ACCESS_TOKEN_TTL`, `REFRESH_TOKEN_TTL`,
    /// `EMAIL_RESEND_LIMIT_PER_HOUR`, `FRONTEND_URL` (spec §6.1).
    pub fn from_env() -> Self {
        let hours = |key: &str, default: i64| -> i64 {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        Self {
            access_ttl: Duration::hours(hours("ACCESS_TOKEN_TTL", 24)),
            refresh_ttl: Duration::hours(hours("REFRESH_TOKEN_TTL", 24 * 7)),
            resend_limit_per_hour: hours("EMAIL_RESEND_LIMIT_PER_HOUR", 3),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::days(7),
            resend_limit_per_hour: 3,
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

pub struct AuthService {
    tenants: TenantRepo,
    refresh_tokens: RefreshTokenRepo,
    verifications: EmailVerificationRepo,
    master_key: MasterKey,
    email_sender: Arc<dyn EmailSender>,
    config: AuthConfig,
}

impl AuthService {
    #[must_use]
    pub fn new(
        tenants: TenantRepo,
        refresh_tokens: RefreshTokenRepo,
        verifications: EmailVerificationRepo,
        master_key: MasterKey,
        email_sender: Arc<dyn EmailSender>,
        config: AuthConfig,
    ) -> Self {
        Self {
            tenants,
            refresh_tokens,
            verifications,
            master_key,
            email_sender,
            config,
        }
    }

    fn decrypt_tenant_secret(&self, blob: &str) -> Result<Vec<u8>, CoreError> {
        secrets::decrypt_secret(&self.master_key, blob)
    }

    /// Spec §6.2 `POST /api/auth/signup`. Email send failure never fails
    /// signup (spec §7); the resend path covers recovery.
    pub async fn signup(
        &self,
        email: &str,
        password_plain: &str,
        company_name: Option<String>,
    ) -> Result<Tenant, CoreError> {
        let violations = password::validate_strength(password_plain);
        if !violations.is_empty() {
            return Err(CoreError::ValidationFields {
                message: "password does not meet strength requirements".to_string(),
                errors: violations.into_iter().map(String::from).collect(),
            });
        }
        if self.tenants.find_by_email(email).await?.is_some() {
            return Err(CoreError::Conflict {
                message: "an account with this email already exists".to_string(),
            });
        }

        let password_hash = password::hash(password_plain)?;
        let pair = secrets::generate_pair();
        let (jwt_secret_enc, jwt_refresh_secret_enc) =
            secrets::encrypt_pair(&self.master_key, &pair)?;
        let api_key = token_gen::generate_api_key();

        let tenant = self
            .tenants
            .create(NewTenant {
                email: email.to_string(),
                company_name,
                password_hash,
                jwt_secret_enc,
                jwt_refresh_secret_enc,
                api_key,
            })
            .await?;

        if let Err(e) = self.issue_verification(&tenant, None, None).await {
            tracing::warn!(tenant_id = %tenant.id, error = %e, "failed to send verification email during signup");
        }

        Ok(tenant)
    }

    async fn issue_verification(
        &self,
        tenant: &Tenant,
        issuer_ip: Option<&str>,
        issuer_agent: Option<&str>,
    ) -> Result<(), CoreError> {
        let raw_token = token_gen::generate_verification_token();
        self.verifications
            .issue(tenant.id, &raw_token, issuer_ip, issuer_agent)
            .await?;
        let verify_url = format!("{}/verify-email?token={}", self.config.frontend_url, raw_token);
        self.email_sender
            .send_verification_email(&tenant.email, &verify_url)
            .await
    }

    /// Spec §4.8 resend rate limit: ≤ N attempts per rolling hour.
    pub async fn resend_verification(&self, email: &str) -> Result<(), CoreError> {
        let tenant = self
            .tenants
            .find_by_email(email)
            .await?
            .ok_or_else(|| CoreError::not_found("no account with this email"))?;

        if tenant.email_verified {
            return Ok(());
        }

        let attempts = self.verifications.attempts_in_last_hour(tenant.id).await?;
        if attempts >= self.config.resend_limit_per_hour {
            let latest = self
                .verifications
                .latest_attempt_at(tenant.id)
                .await?
                .unwrap_or_else(Utc::now);
            let retry_at = latest + Duration::hours(1);
            let retry_after_secs = (retry_at - Utc::now()).num_seconds().max(0) as u64;
            return Err(CoreError::RateLimited { retry_after_secs });
        }

        self.issue_verification(&tenant, None, None).await
    }

    /// Spec §4.8 `verify(token)`.
    pub async fn verify_email(&self, token: &str) -> Result<(), CoreError> {
        if !token_gen::is_valid_verification_token_format(token) {
            return Err(CoreError::validation("malformed verification token"));
        }
        match self.verifications.verify(&self.tenants, token).await? {
            VerifyOutcome::Verified | VerifyOutcome::AlreadyVerified => Ok(()),
            VerifyOutcome::Expired => Err(CoreError::validation("verification token expired")),
            VerifyOutcome::NotFound => Err(CoreError::not_found("verification token not found")),
        }
    }

    /// Spec §4.8 login guards, in order: tenant exists → email verified →
    /// status active → password matches → issue tokens.
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<(Tenant, TokenPair), CoreError> {
        let tenant = self
            .tenants
            .find_by_email(email)
            .await?
            .ok_or_else(|| CoreError::Auth {
                message: "invalid email or password".to_string(),
            })?;

        if !tenant.email_verified {
            return Err(CoreError::Forbidden {
                message: "email not verified".to_string(),
            });
        }
        if tenant.status != TenantStatus::Active {
            return Err(CoreError::Forbidden {
                message: "account is not active".to_string(),
            });
        }
        if !password::verify(password_plain, &tenant.password_hash) {
            return Err(CoreError::Auth {
                message: "invalid email or password".to_string(),
            });
        }

        let pair = self.issue_token_pair(&tenant).await?;
        Ok((tenant, pair))
    }

    async fn issue_token_pair(&self, tenant: &Tenant) -> Result<TokenPair, CoreError> {
        let access_secret = self.decrypt_tenant_secret(&tenant.jwt_secret_enc)?;
        let refresh_secret = self.decrypt_tenant_secret(&tenant.jwt_refresh_secret_enc)?;

        let access_token = tokens::issue(tenant.id, &tenant.email, &access_secret, self.config.access_ttl)?;
        let refresh_token = tokens::issue(tenant.id, &tenant.email, &refresh_secret, self.config.refresh_ttl)?;

        let refresh_hash = token_gen::sha256_hex(&refresh_token);
        self.refresh_tokens
            .insert(tenant.id, &refresh_hash, self.config.refresh_ttl)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.config.access_ttl.num_seconds(),
        })
    }

    /// Verify an access token and return its tenant id and email (spec
    /// §4.8 Verify path). This is the call every authenticated REST/MCP
    /// request runs first.
    pub async fn verify_access_token(&self, token: &str) -> Result<(TenantId, String), CoreError> {
        let tenant_id = tokens::peek_subject(token)?;
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| CoreError::Auth {
                message: "unknown tenant".to_string(),
            })?;
        let secret = self.decrypt_tenant_secret(&tenant.jwt_secret_enc)?;
        let claims = tokens::verify(token, &secret)?;
        Ok((claims.sub, claims.email))
    }

    /// Spec §4.8 refresh: verify, look up by hash, rotate within one
    /// transaction. Replaying the old token after this call fails because
    /// its hash row is now revoked.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair, CoreError> {
        let tenant_id = tokens::peek_subject(presented)?;
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| CoreError::Auth {
                message: "unknown tenant".to_string(),
            })?;
        let refresh_secret = self.decrypt_tenant_secret(&tenant.jwt_refresh_secret_enc)?;
        tokens::verify(presented, &refresh_secret)?;

        let old_hash = token_gen::sha256_hex(presented);
        let access_secret = self.decrypt_tenant_secret(&tenant.jwt_secret_enc)?;
        let new_refresh = tokens::issue(
            tenant.id,
            &tenant.email,
            &refresh_secret,
            self.config.refresh_ttl,
        )?;
        let new_hash = token_gen::sha256_hex(&new_refresh);

        let rotated = self
            .refresh_tokens
            .rotate(&old_hash, &new_hash, self.config.refresh_ttl)
            .await?;
        if rotated.is_none() {
            return Err(CoreError::Auth {
                message: "refresh token invalid, revoked, or expired".to_string(),
            });
        }

        let new_access = tokens::issue(tenant.id, &tenant.email, &access_secret, self.config.access_ttl)?;
        Ok(TokenPair {
            access_token: new_access,
            refresh_token: new_refresh,
            expires_in: self.config.access_ttl.num_seconds(),
        })
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<(), CoreError> {
        let hash = token_gen::sha256_hex(refresh_token);
        self.refresh_tokens.revoke_one(&hash).await
    }

    pub async fn logout_all(&self, tenant_id: TenantId) -> Result<u64, CoreError> {
        self.refresh_tokens.revoke_all(tenant_id).await
    }

    pub async fn set_embedder_key(&self, tenant_id: TenantId, api_key: Option<&str>) -> Result<(), CoreError> {
        let enc = api_key
            .map(|k| corpora_crypto::aead::encrypt(&self.master_key, k.as_bytes()))
            .transpose()?;
        self.tenants.set_embedder_key(tenant_id, enc.as_deref()).await
    }

    /// Decrypt a tenant's external embedder key, if one is configured
    /// (spec §4.11 "fall back to platform key if absent").
    pub async fn embedder_key(&self, tenant: &Tenant) -> Result<Option<String>, CoreError> {
        match &tenant.embedder_api_key_enc {
            Some(blob) => {
                let bytes = self.decrypt_tenant_secret(blob)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            None => Ok(None),
        }
    }

    /// Periodic sweep of expired refresh rows (spec §4.8).
    pub async fn sweep_expired_refresh_tokens(&self) -> Result<u64, CoreError> {
        self.refresh_tokens.sweep_expired().await
    }
}
