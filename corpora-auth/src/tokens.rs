//! Per-tenant JWT issuance and verification (spec §4.8).
//!
//! Verification never trusts the presented token's claims for secret
//! lookup: the subject is peeked from the unverified payload, the matching
//! tenant's secret is loaded, and only then is the signature (and expiry)
//! checked against it. A token forged with someone else's `sub` still fails
//! because its signature was produced with the wrong tenant's secret.

use crate::claims::{TokenClaims, UnverifiedSubject};
use base64::Engine;
use chrono::{Duration, Utc};
use corpora_core::{CoreError, TenantId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Sign a token for `tenant_id`/`email`, expiring after `ttl`.
pub fn issue(tenant_id: TenantId, email: &str, secret: &[u8], ttl: Duration) -> Result<String, CoreError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: tenant_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| CoreError::Auth {
            message: format!("failed to sign token: {e}"),
        })
}

/// Peek the `sub` claim out of a JWT without verifying its signature (spec
/// §4.8 "Verify path" step 1). This is the only place an unverified claim is
/// ever read; it exists solely to pick which tenant's secret to load next.
pub fn peek_subject(token: &str) -> Result<TenantId, CoreError> {
    let payload_b64 = token
        .split('.')
        .nth(1)
        .ok_or_else(|| CoreError::Auth {
            message: "malformed token".to_string(),
        })?;
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| CoreError::Auth {
            message: "malformed token payload".to_string(),
        })?;
    let unverified: UnverifiedSubject =
        serde_json::from_slice(&payload).map_err(|_| CoreError::Auth {
            message: "malformed token claims".to_string(),
        })?;
    Ok(unverified.sub)
}

/// Verify a token's signature and expiry against `secret` (spec §4.8 steps
/// 2-3). Any failure — wrong secret, expired, malformed — is `AuthError`.
pub fn verify(token: &str, secret: &[u8]) -> Result<TokenClaims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| CoreError::Auth {
            message: format!("invalid or expired token: {e}"),
        })?;
    Ok(data.claims)
}
