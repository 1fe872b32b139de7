//! In-process key/value store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Volatile store backed by a map. Used by tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    fn with_entries<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, KeyValueStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KeyValueStoreError::read(key, "store lock poisoned"))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        self.with_entries(key, |entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.with_entries(key, |entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.with_entries(key, |entries| {
            entries.remove(key);
        })
    }
}
