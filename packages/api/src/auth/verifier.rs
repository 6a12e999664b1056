use sqlx::PgPool;
use store::{Profile, SecretVerifier, StoreError};

use super::password::{hash_secret, verify_secret};

/// Checks secrets against the Argon2 hashes in `profile_credentials`.
#[derive(Clone, Debug)]
pub struct CredentialVerifier {
    pool: PgPool,
}

impl CredentialVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SecretVerifier for CredentialVerifier {
    async fn verify(&self, profile: &Profile, secret: &str) -> Result<bool, StoreError> {
        let stored: Option<(String,)> =
            sqlx::query_as("SELECT secret_hash FROM profile_credentials WHERE profile_id = $1")
                .bind(&profile.id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

        let Some((hash,)) = stored else {
            tracing::info!("Profile {} has no credential", profile.id);
            return Ok(false);
        };
        verify_secret(secret, &hash).map_err(StoreError::Backend)
    }
}

/// Store (or replace) the secret of `profile_id`.
pub async fn set_credential(pool: &PgPool, profile_id: &str, secret: &str) -> Result<(), StoreError> {
    let hash = hash_secret(secret).map_err(StoreError::Backend)?;
    sqlx::query(
        "INSERT INTO profile_credentials (profile_id, secret_hash) VALUES ($1, $2) \
         ON CONFLICT (profile_id) DO UPDATE SET secret_hash = EXCLUDED.secret_hash, updated_at = now()",
    )
    .bind(profile_id)
    .bind(&hash)
    .execute(pool)
    .await
    .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(())
}
