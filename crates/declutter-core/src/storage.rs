//! Local Storage
//!
//! Plain key-value string storage, read once at startup and written on
//! every change. Malformed values are treated as absent.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Durable string storage (browser localStorage in the app)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Read and parse a JSON value, falling back to `T::default()` when the key
/// is missing or its content does not parse.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Falling back to default state");
                T::default()
            }
        },
        None => T::default(),
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(err) => warn!(key, error = %err, "Failed to persist state"),
    }
}

/// In-memory store for tests and for browsers without storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn test_missing_key_is_default() {
        let store = MemoryStore::new();
        assert_eq!(load_json::<Counter>(&store, "c"), Counter::default());
    }

    #[test]
    fn test_corrupt_json_is_default() {
        let store = MemoryStore::new();
        store.set("c", "{not json");
        assert_eq!(load_json::<Counter>(&store, "c"), Counter::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, "c", &Counter { value: 3 });
        assert_eq!(load_json::<Counter>(&store, "c"), Counter { value: 3 });

        store.remove("c");
        assert!(store.get("c").is_none());
    }
}
