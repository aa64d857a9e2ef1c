pub mod file_storage;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::{PokedexError, Result};

pub use file_storage::FileStorage;
pub use memory::MemoryStorage;

/// Durable string key-value storage, the persistence collaborator of the
/// favorites and profile stores.
///
/// Implementations must make `set` atomic per key: a subsequent `get`
/// returns either the previous value or the new one in full.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key has never been set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Read and decode a JSON value. Malformed JSON is a storage error,
    /// never an absent value.
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| PokedexError::storage(key, e)),
        }
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| PokedexError::storage(key, e))?;
        self.set(key, raw).await
    }
}
