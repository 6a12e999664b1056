//! # Database module: PostgreSQL pool, record store and seeding
//!
//! Entirely gated behind `#[cfg(feature = "server")]` so client (WASM) builds
//! never pull in SQLx or Tokio networking code.
//!
//! - [`get_pool`]: lazy, process-wide pool backed by a [`tokio::sync::OnceCell`].
//!   The first call reads `DATABASE_URL` (via `dotenvy`) and opens up to 5
//!   connections.
//! - [`PgRecordStore`]: the [`store::RecordStore`] over the single `records`
//!   table, one JSONB document per row.
//! - [`seed_if_empty`]: loads the demo dataset and its credentials into a
//!   fresh database.

#[cfg(feature = "server")]
mod pg_store;
#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod seed;

#[cfg(feature = "server")]
pub use pg_store::PgRecordStore;
#[cfg(feature = "server")]
pub use pool::get_pool;
#[cfg(feature = "server")]
pub use seed::seed_if_empty;
