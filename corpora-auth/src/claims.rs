//! JWT payload shape shared by access and refresh tokens (spec §4.8).

use corpora_core::TenantId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: TenantId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The subset of a JWT we can read from an unverified payload: enough to
/// look up which tenant's secret should verify the rest (spec §4.8 "Verify
/// path" step 1).
#[derive(Debug, Clone, Deserialize)]
pub struct UnverifiedSubject {
    pub sub: TenantId,
}
