//! AEAD encryption of per-tenant secrets at rest (spec §4.1).
//!
//! Ciphertext is stored as `hex(nonce):hex(tag):hex(ciphertext)`. AES-256-GCM
//! appends the tag to the ciphertext internally; we split it back out on
//! encode so the on-disk layout matches the spec exactly and so tampering
//! with any one field is independently detectable before the AEAD open call
//! even runs.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use corpora_core::CoreError;
use rand::RngCore;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// The 256-bit master key used to encrypt every tenant's secret material.
#[derive(Clone)]
pub struct MasterKey(Key<Aes256Gcm>);

impl MasterKey {
    /// Parse a 32-byte hex-encoded master key (the `MASTER_ENCRYPTION_KEY`
    /// environment variable, spec §6.1).
    pub fn from_hex(hex_key: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(hex_key).map_err(|e| CoreError::Crypto {
            message: format!("master key is not valid hex: {e}"),
        })?;
        if bytes.len() != 32 {
            return Err(CoreError::Crypto {
                message: format!("master key must be 32 bytes, got {}", bytes.len()),
            });
        }
        Ok(Self(*Key::<Aes256Gcm>::from_slice(&bytes)))
    }

    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(*Key::<Aes256Gcm>::from_slice(&bytes))
    }
}

/// Encrypt `plaintext` under the master key, producing the
/// `hex(nonce):hex(tag):hex(ciphertext)` blob layout from spec §4.1.
pub fn encrypt(master_key: &MasterKey, plaintext: &[u8]) -> Result<String, CoreError> {
    let cipher = Aes256Gcm::new(&master_key.0);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CoreError::Crypto {
            message: "AEAD encryption failed".to_string(),
        })?;
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    Ok(format!(
        "{}:{}:{}",
        hex::encode(nonce_bytes),
        hex::encode(tag),
        hex::encode(ciphertext)
    ))
}

/// Decrypt a blob produced by [`encrypt`]. Any tampered field — nonce, tag,
/// or ciphertext — surfaces as [`CoreError::Crypto`] (spec §8 round-trip law).
pub fn decrypt(master_key: &MasterKey, blob: &str) -> Result<Vec<u8>, CoreError> {
    let mut parts = blob.splitn(3, ':');
    let (nonce_hex, tag_hex, ciphertext_hex) = match (parts.next(), parts.next(), parts.next()) {
        (Some(n), Some(t), Some(c)) => (n, t, c),
        _ => {
            return Err(CoreError::Crypto {
                message: "malformed ciphertext blob".to_string(),
            })
        }
    };

    let nonce_bytes = hex::decode(nonce_hex).map_err(|_| CoreError::Crypto {
        message: "malformed nonce hex".to_string(),
    })?;
    let tag_bytes = hex::decode(tag_hex).map_err(|_| CoreError::Crypto {
        message: "malformed tag hex".to_string(),
    })?;
    let mut ciphertext_bytes = hex::decode(ciphertext_hex).map_err(|_| CoreError::Crypto {
        message: "malformed ciphertext hex".to_string(),
    })?;

    if nonce_bytes.len() != NONCE_LEN || tag_bytes.len() != TAG_LEN {
        return Err(CoreError::Crypto {
            message: "malformed nonce/tag length".to_string(),
        });
    }

    ciphertext_bytes.extend_from_slice(&tag_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = Aes256Gcm::new(&master_key.0);
    cipher
        .decrypt(nonce, ciphertext_bytes.as_ref())
        .map_err(|_| CoreError::Crypto {
            message: "AEAD authentication failed (tampered or wrong key)".to_string(),
        })
}
