//! # Session persistence
//!
//! The signed-in health unit survives reloads through a single JSON value
//! stored under one well-known key:
//!
//! ```json
//! { "unit": { "id": "h1", "name": "Hospital Central", "type": "Hospital" } }
//! ```
//!
//! ## Layers
//!
//! | Type | Role |
//! |------|------|
//! | [`KeyValueStore`] | Synchronous string storage: browser `localStorage`, a data directory, or memory. |
//! | [`SessionStore`] | `save` / `restore` / `clear` of the session value on top of a key-value backend. A value that fails to parse is removed and reported as absent. |
//! | [`SessionState`] | The application-state container: holds the current unit and is the only code path that writes the session. |

use crate::models::{HealthUnit, Session};

/// Default storage key for the session value.
pub const SESSION_KEY: &str = "hospadmin.session";

/// Minimal string storage shared by all session backends.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persists the single signed-in unit under one key.
#[derive(Clone, Debug)]
pub struct SessionStore<K: KeyValueStore> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, SESSION_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, unit: &HealthUnit) -> Result<(), SessionError> {
        let value = serde_json::to_string(&Session { unit: unit.clone() })?;
        self.kv.set(&self.key, &value);
        Ok(())
    }

    /// Read the stored unit. A corrupt value is deleted and treated as absent.
    pub fn restore(&self) -> Option<HealthUnit> {
        let raw = self.kv.get(&self.key)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session.unit),
            Err(e) => {
                tracing::warn!("Discarding unreadable session under {}: {}", self.key, e);
                self.kv.remove(&self.key);
                None
            }
        }
    }

    pub fn clear(&self) {
        self.kv.remove(&self.key);
    }
}

/// Current authentication context with a single writer path.
///
/// Every sign-in, unit switch and sign-out goes through this type so the
/// in-memory unit and the persisted session never disagree.
#[derive(Clone, Debug)]
pub struct SessionState<K: KeyValueStore> {
    store: SessionStore<K>,
    unit: Option<HealthUnit>,
}

impl<K: KeyValueStore> SessionState<K> {
    pub fn new(store: SessionStore<K>) -> Self {
        Self { store, unit: None }
    }

    /// Load the persisted session, if any. Call once at startup.
    pub fn restore_on_start(&mut self) -> Option<&HealthUnit> {
        self.unit = self.store.restore();
        self.unit.as_ref()
    }

    pub fn unit(&self) -> Option<&HealthUnit> {
        self.unit.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.unit.is_some()
    }

    pub fn sign_in(&mut self, unit: HealthUnit) -> Result<(), SessionError> {
        self.store.save(&unit)?;
        tracing::info!("Session started for unit {}", unit.id);
        self.unit = Some(unit);
        Ok(())
    }

    /// Replace the active unit. Only meaningful while signed in.
    pub fn switch_unit(&mut self, unit: HealthUnit) -> Result<bool, SessionError> {
        if self.unit.is_none() {
            return Ok(false);
        }
        self.store.save(&unit)?;
        tracing::info!("Switched active unit to {}", unit.id);
        self.unit = Some(unit);
        Ok(true)
    }

    pub fn sign_out(&mut self) {
        self.store.clear();
        if let Some(unit) = self.unit.take() {
            tracing::info!("Session ended for unit {}", unit.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;
    use crate::models::UnitType;

    fn unit() -> HealthUnit {
        HealthUnit::new("h1", "Hospital Municipal São José", UnitType::Hospital)
    }

    #[test]
    fn test_restore_after_save_roundtrip() {
        let store = SessionStore::new(MemoryKv::new());
        assert!(store.restore().is_none());

        for u in [unit(), HealthUnit::master(), HealthUnit::new("l1", "Lab Ção", UnitType::Laboratorio)] {
            store.save(&u).unwrap();
            assert_eq!(store.restore(), Some(u));
        }
    }

    #[test]
    fn test_corrupt_value_is_cleared() {
        let kv = MemoryKv::new();
        let store = SessionStore::new(kv.clone());
        store.save(&unit()).unwrap();

        kv.set(SESSION_KEY, "{not json");
        assert!(store.restore().is_none());
        assert!(kv.get(SESSION_KEY).is_none());
        assert!(store.restore().is_none());

        // Well-formed JSON with the wrong shape is also discarded
        kv.set(SESSION_KEY, r#"{"unit":{"id":"x","name":"y","type":"Spaceport"}}"#);
        assert!(store.restore().is_none());
        assert!(kv.get(SESSION_KEY).is_none());
    }

    #[test]
    fn test_clear_and_custom_key() {
        let kv = MemoryKv::new();
        let store = SessionStore::with_key(kv.clone(), "custom");
        store.save(&unit()).unwrap();
        assert!(kv.get("custom").is_some());
        assert!(kv.get(SESSION_KEY).is_none());
        store.clear();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_session_state_single_writer() {
        let kv = MemoryKv::new();
        let mut state = SessionState::new(SessionStore::new(kv.clone()));
        assert!(state.restore_on_start().is_none());

        // Switching without a session is refused
        assert!(!state.switch_unit(unit()).unwrap());
        assert!(kv.get(SESSION_KEY).is_none());

        state.sign_in(HealthUnit::master()).unwrap();
        assert!(state.is_authenticated());
        assert!(state.switch_unit(unit()).unwrap());
        assert_eq!(state.unit(), Some(&unit()));

        // A fresh container sees the persisted unit
        let mut reloaded = SessionState::new(SessionStore::new(kv.clone()));
        assert_eq!(reloaded.restore_on_start(), Some(&unit()));

        state.sign_out();
        assert!(!state.is_authenticated());
        assert!(kv.get(SESSION_KEY).is_none());
    }
}
