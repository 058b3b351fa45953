//! Browser Storage
//!
//! `localStorage` behind the core crate's key-value seam. Private browsing
//! modes without storage fall back to a per-tab memory store.

use declutter_core::storage::{KeyValueStore, MemoryStore};

pub enum BrowserStorage {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStorage {
    pub fn open() -> Self {
        match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            Some(storage) => BrowserStorage::Local(storage),
            None => {
                tracing::warn!("localStorage unavailable, preferences will not persist");
                BrowserStorage::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStorage::Local(s) => s.get_item(key).ok().flatten(),
            BrowserStorage::Memory(m) => m.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            BrowserStorage::Local(s) => {
                if let Err(err) = s.set_item(key, value) {
                    tracing::warn!(key, error = ?err, "localStorage write failed");
                }
            }
            BrowserStorage::Memory(m) => m.set(key, value),
        }
    }

    fn remove(&self, key: &str) {
        match self {
            BrowserStorage::Local(s) => {
                let _ = s.remove_item(key);
            }
            BrowserStorage::Memory(m) => m.remove(key),
        }
    }
}
