use store::{Seed, StoreError};

use super::PgRecordStore;
use crate::auth::set_credential;

/// Load the demo dataset when `HOSPADMIN_SEED=1` and the database holds no records.
/// Returns the number of records written.
pub async fn seed_if_empty(store: &PgRecordStore) -> Result<usize, StoreError> {
    if std::env::var("HOSPADMIN_SEED").as_deref() != Ok("1") {
        return Ok(0);
    }
    if !store.is_empty().await? {
        tracing::info!("Database already has records, skipping seed");
        return Ok(0);
    }

    let seed = Seed::demo();
    let written = seed.load_into(store).await?;
    let secrets = Seed::demo_secrets();
    for (profile_id, secret) in &secrets {
        set_credential(store.pool(), profile_id, secret).await?;
    }
    tracing::info!("Seeded {} credentials", secrets.len());
    Ok(written)
}
