//! # Secret hashing and verification: Argon2id
//!
//! Profile secrets are never stored in clear. [`hash_secret`] salts with
//! [`OsRng`] and returns a PHC string (`$argon2id$v=19$m=19456,t=2,p=1$...`)
//! for the `profile_credentials.secret_hash` column; [`verify_secret`] checks
//! a submitted secret against it.
//!
//! A malformed stored hash is an error, not a mismatch, so a corrupted row
//! shows up in the logs instead of silently locking the user out.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a secret using Argon2id. Returns a PHC-format string.
pub fn hash_secret(secret: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Failed to hash secret: {}", e))
}

/// Verify a secret against a PHC-format hash string.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("Invalid secret hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_secret("ana2026").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret("ana2026", &hash).unwrap());
        assert!(!verify_secret("ana2025", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_secret("x").unwrap(), hash_secret("x").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_secret("x", "plain-text").is_err());
    }
}
