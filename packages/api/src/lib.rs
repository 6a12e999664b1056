//! # API crate: shared fullstack server functions for HospAdmin
//!
//! Every Dioxus server function the web frontend calls lives here, with the
//! server-side modules they depend on.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Argon2 secret hashing, the credential-backed verifier, session keys |
//! | [`config`] | `server` | `hospadmin.toml` loaded once per process |
//! | [`db`] | `server` | PostgreSQL pool, [`db::PgRecordStore`], demo seeding |
//! | [`models`] | none | [`LoginReply`] and [`UiSettings`] |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` annotated with `#[get(...)]` or `#[post(...)]` is
//! compiled twice: once with full server logic (behind
//! `#[cfg(feature = "server")]`) and once as a thin client stub that forwards
//! the call over HTTP.
//!
//! - **Session**: `login`, `current_unit`, `switch_unit`, `list_units`, `logout`
//! - **Records**: `fetch_collection`, `save_record`, `set_profile_secret`
//! - **Settings**: `ui_settings`
//!
//! Every records call is scoped to the unit stored in the session. The master
//! unit sees all rows; any other unit only sees and writes rows whose
//! `unit_id` is its own. Administration collections are master only.

use dioxus::prelude::*;
use serde_json::Value;
use store::{Collection, HealthUnit};

pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod db;
pub mod models;
mod remote;

pub use models::{LoginReply, UiSettings};
pub use remote::{fetch_records, ApiRecordStore};

/// Collections only the master unit may read or write.
pub fn is_admin_collection(collection: Collection) -> bool {
    matches!(
        collection,
        Collection::HealthUnits | Collection::Profiles | Collection::AuditLogs
    )
}

#[cfg(feature = "server")]
fn server_error(e: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::new(e.to_string())
}

#[cfg(feature = "server")]
async fn record_store() -> Result<db::PgRecordStore, ServerFnError> {
    let pool = db::get_pool().await.map_err(server_error)?;
    Ok(db::PgRecordStore::new(pool.clone()))
}

#[cfg(feature = "server")]
async fn signed_in(session: &tower_sessions::Session) -> Result<auth::SessionData, ServerFnError> {
    auth::SessionData::load(session)
        .await
        .map_err(server_error)?
        .ok_or_else(|| ServerFnError::new("Not signed in"))
}

#[cfg(feature = "server")]
fn require_access(data: &auth::SessionData, collection: Collection) -> Result<(), ServerFnError> {
    if is_admin_collection(collection) && !data.unit.is_master() {
        return Err(ServerFnError::new(
            "Administration is restricted to the master unit",
        ));
    }
    Ok(())
}

/// Best-effort audit trail entry; failures are logged, never returned.
#[cfg(feature = "server")]
async fn audit(
    store: &db::PgRecordStore,
    data: &auth::SessionData,
    action: &str,
    module: &str,
    level: store::modules::admin::LogLevel,
) {
    use store::modules::admin::AuditLog;
    use store::RecordStore;

    let entry = AuditLog::now(&data.unit.id, &data.user, action, module, level);
    if let Err(e) = store.insert(entry).await {
        tracing::error!("Failed to write audit log: {}", e);
    }
}

/// Sign in with an identifier (e-mail, name or reserved id) and a secret.
#[cfg(feature = "server")]
#[post("/api/auth/login", session: tower_sessions::Session)]
pub async fn login(identifier: String, secret: String) -> Result<LoginReply, ServerFnError> {
    use store::modules::admin::LogLevel;
    use store::{Authenticator, MemoryRecordStore, StaticSecrets};

    let config = config::app_config();
    let store = record_store().await;

    let result = match &store {
        Ok(store) => {
            let verifier = auth::CredentialVerifier::new(store.pool().clone());
            Authenticator::new(store.clone(), verifier, &config.auth)
                .authenticate(&identifier, &secret, &[])
                .await
        }
        Err(e) => {
            // Only reserved accounts get through without a database.
            tracing::error!("Record store unavailable during login: {}", e);
            let offline = MemoryRecordStore::new();
            offline.set_reachable(false);
            Authenticator::new(offline, StaticSecrets::new(), &config.auth)
                .authenticate(&identifier, &secret, &[])
                .await
        }
    };

    let unit = match result {
        Ok(unit) => unit,
        Err(e) => {
            tracing::info!("Login failed for {}: {}", identifier.trim(), e);
            return Ok(LoginReply::Rejected(e.to_string()));
        }
    };

    let data = auth::SessionData {
        unit: unit.clone(),
        home: unit.clone(),
        user: identifier.trim().to_string(),
    };
    session.cycle_id().await.map_err(server_error)?;
    data.save(&session).await.map_err(server_error)?;
    tracing::info!("{} signed in to unit {}", data.user, unit.id);

    if let Ok(store) = &store {
        audit(store, &data, "Login", "Auth", LogLevel::Info).await;
    }
    Ok(LoginReply::SignedIn(unit))
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login")]
pub async fn login(identifier: String, secret: String) -> Result<LoginReply, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// The unit the current session is working in, if signed in.
#[cfg(feature = "server")]
#[get("/api/auth/unit", session: tower_sessions::Session)]
pub async fn current_unit() -> Result<Option<HealthUnit>, ServerFnError> {
    let data = auth::SessionData::load(&session)
        .await
        .map_err(server_error)?;
    Ok(data.map(|d| d.unit))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/unit")]
pub async fn current_unit() -> Result<Option<HealthUnit>, ServerFnError> {
    Ok(None)
}

/// Units the session may switch to: every unit for a master login, otherwise only the home unit.
#[cfg(feature = "server")]
#[get("/api/auth/units", session: tower_sessions::Session)]
pub async fn list_units() -> Result<Vec<HealthUnit>, ServerFnError> {
    use store::RecordStore;

    let data = signed_in(&session).await?;
    if !data.home.is_master() {
        return Ok(vec![data.home]);
    }
    let store = record_store().await?;
    let mut units: Vec<HealthUnit> = store.select_all().await.map_err(server_error)?;
    units.insert(0, HealthUnit::master());
    Ok(units)
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/units")]
pub async fn list_units() -> Result<Vec<HealthUnit>, ServerFnError> {
    Ok(Vec::new())
}

/// Move the session to another unit.
#[cfg(feature = "server")]
#[post("/api/auth/switch-unit", session: tower_sessions::Session)]
pub async fn switch_unit(unit_id: String) -> Result<HealthUnit, ServerFnError> {
    use store::models::MASTER_UNIT_ID;
    use store::modules::admin::LogLevel;
    use store::{AuthError, RecordStore};

    let mut data = signed_in(&session).await?;
    let store = record_store().await?;

    let target = if unit_id == MASTER_UNIT_ID {
        HealthUnit::master()
    } else {
        store
            .select_by_id::<HealthUnit>(&unit_id)
            .await
            .map_err(server_error)?
            .ok_or_else(|| server_error(AuthError::UnitNotFound))?
    };

    if !data.may_switch_to(&target) {
        tracing::warn!("{} tried to switch to unit {}", data.user, target.id);
        return Err(ServerFnError::new("Switching to this unit is not allowed"));
    }

    data.unit = target.clone();
    data.save(&session).await.map_err(server_error)?;
    tracing::info!("{} switched to unit {}", data.user, target.id);
    audit(
        &store,
        &data,
        &format!("Switched to {}", target.name),
        "Auth",
        LogLevel::Info,
    )
    .await;
    Ok(target)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/switch-unit")]
pub async fn switch_unit(unit_id: String) -> Result<HealthUnit, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    if let Ok(Some(data)) = auth::SessionData::load(&session).await {
        tracing::info!("{} signed out", data.user);
    }
    session.flush().await.map_err(server_error)?;
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Rows of `collection` visible to the signed-in unit, in insertion order.
#[cfg(feature = "server")]
#[post("/api/records/fetch", session: tower_sessions::Session)]
pub async fn fetch_collection(collection: Collection) -> Result<Vec<Value>, ServerFnError> {
    use store::Filter;

    let data = signed_in(&session).await?;
    require_access(&data, collection)?;

    let scope = (!data.unit.is_master()).then(|| Filter::eq("unit_id", data.unit.id.clone()));
    let store = record_store().await?;
    store
        .rows(collection, scope.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch {}: {}", collection, e);
            server_error(e)
        })
}

#[cfg(not(feature = "server"))]
#[post("/api/records/fetch")]
pub async fn fetch_collection(collection: Collection) -> Result<Vec<Value>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Insert (`create`) or replace a row. The row is validated against its record type first.
#[cfg(feature = "server")]
#[post("/api/records/save", session: tower_sessions::Session)]
pub async fn save_record(
    collection: Collection,
    record: Value,
    create: bool,
) -> Result<Value, ServerFnError> {
    use store::modules::admin::LogLevel;
    use store::modules::validate_row;

    let data = signed_in(&session).await?;
    require_access(&data, collection)?;
    validate_row(collection, &record).map_err(server_error)?;

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let owner = |row: &Value| row.get("unit_id").and_then(Value::as_str).map(str::to_string);
    let store = record_store().await?;

    if !data.unit.is_master() {
        let foreign = |row: &Value| owner(row).is_some_and(|unit_id| unit_id != data.unit.id);
        if foreign(&record) {
            return Err(ServerFnError::new("Record belongs to another unit"));
        }
        if !create {
            let existing = store
                .row_by_id(collection, &id)
                .await
                .map_err(server_error)?;
            if existing.as_ref().is_some_and(foreign) {
                return Err(ServerFnError::new("Record belongs to another unit"));
            }
        }
    }

    let written = if create {
        store.insert_row(collection, &id, record.clone()).await
    } else {
        store.update_row(collection, &id, record.clone()).await
    };
    written.map_err(|e| {
        tracing::error!("Failed to save {} {}: {}", collection, id, e);
        server_error(e)
    })?;

    let verb = if create { "Created" } else { "Updated" };
    if collection != Collection::AuditLogs {
        audit(&store, &data, &format!("{verb} {collection} {id}"), collection.as_str(), LogLevel::Info).await;
    }
    Ok(record)
}

#[cfg(not(feature = "server"))]
#[post("/api/records/save")]
pub async fn save_record(
    collection: Collection,
    record: Value,
    create: bool,
) -> Result<Value, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Set the sign-in secret of a profile. Master unit only.
#[cfg(feature = "server")]
#[post("/api/records/profile-secret", session: tower_sessions::Session)]
pub async fn set_profile_secret(profile_id: String, secret: String) -> Result<(), ServerFnError> {
    use store::modules::admin::LogLevel;
    use store::{Profile, RecordStore};

    let data = signed_in(&session).await?;
    require_access(&data, Collection::Profiles)?;
    if secret.chars().count() < 6 {
        return Err(ServerFnError::new("Secret must be at least 6 characters"));
    }

    let store = record_store().await?;
    let profile = store
        .select_by_id::<Profile>(&profile_id)
        .await
        .map_err(server_error)?
        .ok_or_else(|| ServerFnError::new("User not found"))?;

    auth::set_credential(store.pool(), &profile.id, &secret)
        .await
        .map_err(server_error)?;
    audit(
        &store,
        &data,
        &format!("Reset secret of {}", profile.name),
        "Admin",
        LogLevel::Warning,
    )
    .await;
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/records/profile-secret")]
pub async fn set_profile_secret(profile_id: String, secret: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Page size and session key from the server configuration.
#[cfg(feature = "server")]
#[get("/api/settings")]
pub async fn ui_settings() -> Result<UiSettings, ServerFnError> {
    Ok(UiSettings::from(config::app_config()))
}

#[cfg(not(feature = "server"))]
#[get("/api/settings")]
pub async fn ui_settings() -> Result<UiSettings, ServerFnError> {
    Ok(UiSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_collections() {
        assert!(is_admin_collection(Collection::Profiles));
        assert!(is_admin_collection(Collection::HealthUnits));
        assert!(is_admin_collection(Collection::AuditLogs));
        assert!(!is_admin_collection(Collection::Beds));
        assert!(!is_admin_collection(Collection::Shifts));
    }
}
