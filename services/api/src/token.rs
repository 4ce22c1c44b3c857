//! Opaque bearer token generation and hashing
//!
//! Tokens are 32 random bytes, hex encoded. The database only ever sees
//! the SHA-256 hash; a single pass is enough because the tokens are
//! already high-entropy.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Token byte length before hex encoding (32 bytes = 64 hex chars)
const TOKEN_BYTES: usize = 32;

/// Generate a fresh bearer token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a bearer token for storage and lookup
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn hashing_is_deterministic_and_not_identity() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }
}
