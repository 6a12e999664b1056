//! # Browser `localStorage` backend
//!
//! [`LocalStorageKv`] is the [`KeyValueStore`] used on the web platform. It
//! wraps `window.localStorage`, which is synchronous and scoped to the page
//! origin, so the session survives reloads and is shared across tabs.
//!
//! Storage can be unavailable (private browsing, sandboxed iframes). In that
//! case reads return `None` and writes are dropped: the user simply has to
//! sign in again after a reload.

use web_sys::Storage;

use crate::session::KeyValueStore;

/// `window.localStorage` key-value backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageKv;

impl LocalStorageKv {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorageKv {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!("localStorage rejected write for {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
