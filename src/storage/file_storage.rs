use std::io;
use std::path::{Path, PathBuf};

use crate::atomic::{self, AtomicFile};
use crate::storage::KeyValueStore;
use crate::{PokedexError, Result};

const LOG_PREFIX: &str = "[file-storage]";
const VALUE_EXTENSION: &str = "json";

/// Key-value storage keeping one file per key under a root directory.
pub struct FileStorage {
    log_prefix: String,
    root: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with a diagnostic label and root directory.
    /// The directory is created on first write.
    pub fn new(label: &str, root: &Path) -> Self {
        Self {
            log_prefix: format!("{} {}", LOG_PREFIX, label),
            root: PathBuf::from(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PokedexError::InvalidInput(format!(
                "storage key {key:?}"
            )));
        }
        let path = self
            .root
            .join(key)
            .with_extension(VALUE_EXTENSION);
        AtomicFile::new(path).map_err(|e| PokedexError::storage(key, e))
    }
}

/// Run blocking file I/O for `key` off the async executor.
async fn off_executor<T, F>(key: &str, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| PokedexError::storage(key, e))?
        .map_err(|e| PokedexError::storage(key, e))
}

impl KeyValueStore for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file(key)?;
        let bytes = off_executor(key, move || file.load()).await?;
        match bytes {
            None => {
                log::debug!("{} {} is not set", self.log_prefix, key);
                Ok(None)
            }
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| PokedexError::storage(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file = self.file(key)?;
        let len = value.len();
        off_executor(key, move || atomic::write(&file, value.as_bytes()))
            .await?;
        log::info!(
            "{} {} bytes have been written to {}",
            self.log_prefix,
            len,
            key
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file(key)?;
        off_executor(key, move || file.remove()).await?;
        log::info!("{} {} has been removed", self.log_prefix, key);
        Ok(())
    }
}
