use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::records::{Collection, Filter, Record, RecordStore, StoreError};
use crate::session::KeyValueStore;

type Tables = HashMap<Collection, Vec<Value>>;

/// In-memory RecordStore for tests, offline builds and seeding.
///
/// Clones share the same tables. Rows keep insertion order.
#[derive(Clone, Debug)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
    reachable: Arc<AtomicBool>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self {
            tables: Arc::default(),
            reachable: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a network outage: every request fails with `Unavailable` until re-enabled.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of rows currently held in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.lock().get(&collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().values().all(Vec::is_empty)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_reachable(&self) -> Result<(), StoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }

    fn rows_where<R: Record>(&self, keep: impl Fn(&Value) -> bool) -> Result<Vec<R>, StoreError> {
        self.ensure_reachable()?;
        let tables = self.lock();
        tables
            .get(&R::COLLECTION)
            .into_iter()
            .flatten()
            .filter(|row| keep(row))
            .map(|row| serde_json::from_value(row.clone()).map_err(StoreError::from))
            .collect()
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl RecordStore for MemoryRecordStore {
    async fn select_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.rows_where(|_| true)
    }

    async fn select_where<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        self.rows_where(|row| filter.matches_value(row))
    }

    async fn select_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self
            .rows_where::<R>(|row| row_id(row) == Some(id))?
            .into_iter()
            .next())
    }

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.ensure_reachable()?;
        let row = serde_json::to_value(&record)?;
        let mut tables = self.lock();
        let table = tables.entry(R::COLLECTION).or_default();
        if table.iter().any(|r| row_id(r) == Some(record.id())) {
            return Err(StoreError::Conflict {
                collection: R::COLLECTION,
                id: record.id().to_string(),
            });
        }
        table.push(row);
        Ok(record)
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.ensure_reachable()?;
        let row = serde_json::to_value(&record)?;
        let mut tables = self.lock();
        let slot = tables
            .get_mut(&R::COLLECTION)
            .and_then(|table| table.iter_mut().find(|r| row_id(r) == Some(record.id())))
            .ok_or_else(|| StoreError::NotFound {
                collection: R::COLLECTION,
                id: record.id().to_string(),
            })?;
        *slot = row;
        Ok(record)
    }
}

/// In-memory key-value backend for the session store.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthUnit, Profile, ProfileStatus, UnitType};

    fn profile(id: &str, email: &str) -> Profile {
        Profile {
            id: id.into(),
            name: format!("Profile {id}"),
            role: "Médico".into(),
            email: email.into(),
            status: ProfileStatus::Active,
            department: "Clínica".into(),
            unit_id: "h1".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_select() {
        let store = MemoryRecordStore::new();
        assert!(store.is_empty());

        store.insert(profile("p1", "a@x.org")).await.unwrap();
        store.insert(profile("p2", "b@x.org")).await.unwrap();

        let all: Vec<Profile> = store.select_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "p1");

        let found: Option<Profile> = store.select_by_id("p2").await.unwrap();
        assert_eq!(found.unwrap().email, "b@x.org");

        let none: Option<Profile> = store.select_by_id("p9").await.unwrap();
        assert!(none.is_none());

        // Other collections stay empty
        let units: Vec<HealthUnit> = store.select_all().await.unwrap();
        assert!(units.is_empty());
    }

    #[tokio::test]
    async fn test_select_where_or_filter() {
        let store = MemoryRecordStore::new();
        store.insert(profile("p1", "a@x.org")).await.unwrap();
        store.insert(profile("p2", "b@x.org")).await.unwrap();

        let hits: Vec<Profile> = store
            .select_where(&Filter::any_of([("email", "Profile p2"), ("name", "Profile p2")]))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p2");
    }

    #[tokio::test]
    async fn test_insert_conflict_and_update_missing() {
        let store = MemoryRecordStore::new();
        let unit = HealthUnit::new("h1", "Hospital Central", UnitType::Hospital);
        store.insert(unit.clone()).await.unwrap();

        assert!(matches!(
            store.insert(unit.clone()).await,
            Err(StoreError::Conflict { .. })
        ));
        assert!(matches!(
            store.update(HealthUnit::new("h9", "X", UnitType::Ubs)).await,
            Err(StoreError::NotFound { .. })
        ));

        let renamed = HealthUnit::new("h1", "Hospital Central II", UnitType::Hospital);
        store.update(renamed.clone()).await.unwrap();
        let loaded: Option<HealthUnit> = store.select_by_id("h1").await.unwrap();
        assert_eq!(loaded, Some(renamed));
        assert_eq!(store.len(Collection::HealthUnits), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_every_call() {
        let store = MemoryRecordStore::new();
        store.set_reachable(false);
        let result: Result<Vec<Profile>, _> = store.select_all().await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.insert(profile("p1", "a@x.org")).await.is_err());
    }

    #[test]
    fn test_memory_kv() {
        let kv = MemoryKv::new();
        assert!(kv.get("k").is_none());
        kv.set("k", "v");
        assert_eq!(kv.get("k").as_deref(), Some("v"));
        kv.remove("k");
        assert!(kv.get("k").is_none());
    }
}
