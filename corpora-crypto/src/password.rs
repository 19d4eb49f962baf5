//! Memory-hard password hashing (spec §4.1).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use corpora_core::CoreError;
use rand::rngs::OsRng;

/// Hash a plaintext password. Never logs or returns the plaintext.
pub fn hash(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CoreError::Crypto {
            message: format!("password hashing failed: {e}"),
        })
}

/// Verify a plaintext password against a stored hash. Never reproduces the
/// plaintext in any error path (spec §8 password secrecy law).
#[must_use]
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Validate password strength per spec §6.2: min 8 chars, upper, lower,
/// digit, symbol. Returns field-level violations rather than a single
/// boolean so the caller can build a §7 `errors[]` array.
#[must_use]
pub fn validate_strength(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if password.len() < 8 {
        errors.push("password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("password must contain a digit");
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        errors.push("password must contain a symbol");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_matches_only_original() {
        let h = hash("Abcd1234!").unwrap();
        assert!(verify("Abcd1234!", &h));
        assert!(!verify("Abcd1235!", &h));
    }

    #[test]
    fn strength_rules() {
        assert!(validate_strength("Abcd1234!").is_empty());
        assert!(!validate_strength("short1!").is_empty());
        assert!(!validate_strength("alllowercase1!").is_empty());
        assert!(!validate_strength("ALLUPPER123!").is_empty());
        assert!(!validate_strength("NoDigitsHere!").is_empty());
        assert!(!validate_strength("NoSymbols123").is_empty());
    }
}
