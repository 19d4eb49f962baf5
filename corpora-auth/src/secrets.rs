//! Per-tenant signing secret generation and encryption (spec §3, §4.8).
//!
//! Two independent 64-byte random secrets are generated at tenant creation
//! — one for access tokens, one for refresh tokens — so that compromising
//! one signing key never lets an attacker forge the other token type.

use corpora_core::CoreError;
use corpora_crypto::aead::{self, MasterKey};
use corpora_crypto::token::generate_jwt_secret;

/// A tenant's freshly generated signing secrets, still in plaintext. Callers
/// must encrypt both fields with [`encrypt_pair`] before persisting and
/// never log or return this value.
pub struct TenantSecretPair {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
}

#[must_use]
pub fn generate_pair() -> TenantSecretPair {
    TenantSecretPair {
        access_secret: generate_jwt_secret(),
        refresh_secret: generate_jwt_secret(),
    }
}

/// Encrypt both secrets under the master key for storage on the tenant row.
pub fn encrypt_pair(
    master_key: &MasterKey,
    pair: &TenantSecretPair,
) -> Result<(String, String), CoreError> {
    let access_enc = aead::encrypt(master_key, &pair.access_secret)?;
    let refresh_enc = aead::encrypt(master_key, &pair.refresh_secret)?;
    Ok((access_enc, refresh_enc))
}

/// Decrypt a tenant's stored secret blob. Used on every token verify/issue
/// so a plaintext secret never persists beyond the call that needs it.
pub fn decrypt_secret(master_key: &MasterKey, blob: &str) -> Result<Vec<u8>, CoreError> {
    aead::decrypt(master_key, blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_secrets_are_independent() {
        let pair = generate_pair();
        assert_ne!(pair.access_secret, pair.refresh_secret);
        assert_eq!(pair.access_secret.len(), 64);
        assert_eq!(pair.refresh_secret.len(), 64);
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let key = MasterKey::generate();
        let pair = generate_pair();
        let (access_enc, refresh_enc) = encrypt_pair(&key, &pair).unwrap();
        assert_eq!(decrypt_secret(&key, &access_enc).unwrap(), pair.access_secret);
        assert_eq!(decrypt_secret(&key, &refresh_enc).unwrap(), pair.refresh_secret);
    }
}
