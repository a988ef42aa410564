use linklet_core::error::{Result, StorageError};
use linklet_core::{KeyValueBackend, LinkRecord};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "shortenedUrls";

/// Loads and saves the entire link collection under a single backend key.
///
/// There are no incremental writes: every `save` replaces the whole
/// collection, and the last write wins.
#[derive(Debug, Clone)]
pub struct LinkStore<B> {
    backend: B,
    key: String,
}

impl<B: KeyValueBackend> LinkStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Creates a store using [`DEFAULT_STORAGE_KEY`].
    pub fn with_default_key(backend: B) -> Self {
        Self::new(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the collection.
    ///
    /// An absent key is an empty collection. Content that does not parse, or
    /// that breaks the collection invariants, is reported as
    /// [`StorageError::InvalidData`].
    pub async fn load(&self) -> Result<Vec<LinkRecord>> {
        let Some(raw) = self.backend.get(&self.key).await? else {
            debug!(key = %self.key, "no stored collection, starting empty");
            return Ok(Vec::new());
        };

        let records: Vec<LinkRecord> = serde_json::from_str(&raw).map_err(|e| {
            warn!(key = %self.key, error = %e, "stored collection is malformed");
            StorageError::InvalidData(format!("collection under '{}': {e}", self.key))
        })?;

        check_invariants(&records)?;

        debug!(key = %self.key, links = records.len(), "loaded collection");
        Ok(records)
    }

    /// Replaces the stored collection with `records`.
    pub async fn save(&self, records: &[LinkRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)
            .map_err(|e| StorageError::InvalidData(format!("failed to serialize: {e}")))?;
        self.backend.set(&self.key, &raw).await?;
        debug!(key = %self.key, links = records.len(), "saved collection");
        Ok(())
    }

    /// Removes the stored collection entirely.
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key).await?;
        debug!(key = %self.key, "cleared collection");
        Ok(())
    }
}

fn check_invariants(records: &[LinkRecord]) -> Result<()> {
    let mut codes = HashSet::with_capacity(records.len());
    for record in records {
        if !record.clicks_consistent() {
            return Err(StorageError::InvalidData(format!(
                "link '{}' has {} clicks but {} click events",
                record.short_code,
                record.click_count,
                record.click_events.len()
            )));
        }
        if !codes.insert(record.short_code.as_str()) {
            return Err(StorageError::InvalidData(format!(
                "short code '{}' appears more than once",
                record.short_code
            )));
        }
    }
    Ok(())
}
