use async_trait::async_trait;
use linklet_core::error::{Result, StorageError};
use linklet_core::KeyValueBackend;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A [`KeyValueBackend`] storing each key as a file inside a directory.
///
/// Writes land in a hidden temporary file that is then renamed over the
/// target, so `get` sees either the old value or the new one, never a
/// partial write. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.tmp"))
    }
}

/// Keys become file names: `[A-Za-z0-9._-]`, not starting with `.`.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "key cannot start with '.': '{key}'"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(StorageError::InvalidKey(format!(
            "key must contain only alphanumeric characters, '.', '_' or '-': '{key}'"
        )));
    }
    Ok(())
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{action} {}: {err}", path.display()))
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                trace!(path = %path.display(), bytes = value.len(), "read key");
                Ok(Some(value))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error("failed to read", &path, err)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp = self.temp_path_for(key);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("failed to create", &self.dir, e))?;
        tokio::fs::write(&temp, value)
            .await
            .map_err(|e| io_error("failed to write", &temp, e))?;
        if let Err(err) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_error("failed to replace", &path, err));
        }

        debug!(path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error("failed to remove", &path, err)),
        }
    }
}
