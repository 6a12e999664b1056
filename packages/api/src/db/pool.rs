//! Shared Postgres pool for the record store, the credential table and the
//! session store.
//!
//! Created on first use from `DATABASE_URL`. Pool limits come from the
//! `[database]` section of `hospadmin.toml`; a zero `max_connections` is
//! raised to one.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use store::config::DatabaseConfig;
use tokio::sync::OnceCell;

use crate::config::app_config;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

fn pool_options(limits: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(limits.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(limits.acquire_timeout_secs))
}

pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

        let limits = &app_config().database;
        tracing::info!(
            "Connecting to Postgres (max {} connections)",
            limits.max_connections.max(1)
        );
        pool_options(limits).connect(&database_url).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_limits_from_config() {
        let options = pool_options(&DatabaseConfig {
            max_connections: 0,
            acquire_timeout_secs: 2,
        });
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(2));
    }
}
