use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::ResourceStore;
use crate::errors::StoreError;

/// In-memory resource store.
///
/// Interior mutability lets a host add or drop resources while imports are
/// running; every call takes the lock for the duration of a single lookup.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<FxHashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, content)` pairs.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let store = Self::new();
        for (key, value) in entries {
            store.insert(key, value);
        }
        store
    }

    /// Insert or replace a resource, returning the previous content.
    pub fn insert(&self, key: impl Into<String>, content: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.entries.write().insert(key.into(), content.into())
    }

    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted list of all keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ResourceStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }
}
