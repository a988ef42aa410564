use async_trait::async_trait;
use dashmap::DashMap;
use linklet_core::error::Result;
use linklet_core::KeyValueBackend;
use std::sync::Arc;

/// In-memory implementation of [`KeyValueBackend`] using DashMap.
///
/// Clones share the same map, which lets tests inspect what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    storage: Arc<DashMap<String, String>>,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with one key, e.g. a fixture collection.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.storage.insert(key.into(), value.into());
        backend
    }

    /// Returns the raw value under `key` without going through the async API.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.storage.get(key).map(|v| v.value().clone())
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove(key);
        Ok(())
    }
}
