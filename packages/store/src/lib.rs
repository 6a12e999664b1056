pub mod auth;
pub mod config;
pub mod crud;
pub mod export;
pub mod listing;
pub mod models;
pub mod modules;
pub mod records;
pub mod seed;
pub mod session;

mod memory;
pub use memory::{MemoryKv, MemoryRecordStore};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageKv;

pub use auth::{AuthError, Authenticator, LoginFlow, SecretVerifier, StaticSecrets};
pub use config::HospAdminConfig;
pub use crud::{CrudError, CrudModal, SubmitOutcome};
pub use listing::{ListView, Page};
pub use models::{HealthUnit, Profile, ProfileStatus, UnitType};
pub use modules::{Module, ModuleIcon, Screen};
pub use records::{Collection, Filter, Record, RecordStore, StoreError};
pub use seed::Seed;
pub use session::{KeyValueStore, SessionState, SessionStore};
