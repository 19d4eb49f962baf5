//! CSPRNG token generation for API keys, verification tokens, and raw JWT
//! signing secrets (spec §4.1).

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate `n` random bytes and hex-encode them.
#[must_use]
pub fn random_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A tenant's opaque MCP API key: 32 random bytes, hex-encoded (spec §3).
#[must_use]
pub fn generate_api_key() -> String {
    random_hex(32)
}

/// A 64-hex-char email verification token (spec §3 `EmailVerification`).
#[must_use]
pub fn generate_verification_token() -> String {
    random_hex(32)
}

/// 64 random bytes used to seed a tenant's access or refresh JWT secret
/// (spec §4.8).
#[must_use]
pub fn generate_jwt_secret() -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// sha256 hex digest, used to store refresh tokens by hash rather than
/// plaintext (spec §3 `RefreshToken`, §4.8).
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// `^[0-9a-f]{64}$` — the verification token format from spec §3.
#[must_use]
pub fn is_valid_verification_token_format(token: &str) -> bool {
    token.len() == 64 && token.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_token_format() {
        let t = generate_verification_token();
        assert!(is_valid_verification_token_format(&t));
        assert!(!is_valid_verification_token_format("short"));
        assert!(!is_valid_verification_token_format(&"G".repeat(64)));
        assert!(!is_valid_verification_token_format(&"A".repeat(64)));
    }

    #[test]
    fn sha256_is_deterministic() {
        assert_eq!(sha256_hex("abc"), sha256_hex("abc"));
        assert_ne!(sha256_hex("abc"), sha256_hex("abd"));
    }

    #[test]
    fn api_key_is_64_hex_chars() {
        let k = generate_api_key();
        assert_eq!(k.len(), 64);
        assert!(k.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
