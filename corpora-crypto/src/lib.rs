//! AEAD-encrypt/decrypt per-tenant secrets, hash and verify passwords, and
//! generate CSPRNG tokens — the crypto primitives in spec §4.1 (C1).

pub mod aead;
pub mod password;
pub mod token;

pub use aead::{decrypt, encrypt, MasterKey};
