use crate::error::Result;
use async_trait::async_trait;

/// An opaque string key-value persistence medium.
///
/// The link store keeps its whole collection under a single key, so
/// implementations only need whole-value reads and writes. A write must be
/// all-or-nothing from the point of view of a later `get`.
#[async_trait]
pub trait KeyValueBackend: Send + Sync + 'static {
    /// Reads the value stored under `key`.
    /// Returns `None` if the key has never been written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. It is not an error if the key does not exist.
    async fn remove(&self, key: &str) -> Result<()>;
}
