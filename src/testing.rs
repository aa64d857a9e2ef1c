//! In-process collaborators for the view model tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::CatalogClient;
use crate::item::CatalogItem;
use crate::storage::{KeyValueStore, MemoryStorage};
use crate::{PokedexError, Result};

pub fn item(id: u32, name: &str) -> CatalogItem {
    CatalogItem {
        id,
        display_name: name.to_owned(),
        image_uri: format!("https://img.example/{id}.png"),
        categories: vec!["normal".to_owned()],
    }
}

/// Catalog answering from a fixed list of items.
#[derive(Default)]
pub struct StubCatalog {
    items: Vec<CatalogItem>,
    unreachable: Mutex<HashSet<u32>>,
    page_down: AtomicBool,
    latency: Duration,
    pub page_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Make `fetch_item_by_id(id)` fail with a network error.
    pub fn unreachable(self, id: u32) -> Self {
        self.unreachable.lock().unwrap().insert(id);
        self
    }

    /// Delay every `fetch_item_by_id` answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_page_down(&self, down: bool) {
        self.page_down.store(down, Ordering::SeqCst);
    }
}

impl CatalogClient for StubCatalog {
    async fn fetch_catalog_page(&self, limit: u32) -> Result<Vec<CatalogItem>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.page_down.load(Ordering::SeqCst) {
            return Err(PokedexError::Network("connection refused".to_owned()));
        }
        Ok(self.items.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_item_by_id(&self, id: u32) -> Result<CatalogItem> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.unreachable.lock().unwrap().contains(&id) {
            return Err(PokedexError::Network(format!("item {id} timed out")));
        }
        self.items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(PokedexError::NotFound(id))
    }
}

/// Memory storage whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    read_only: AtomicBool,
}

impl FlakyStorage {
    pub fn with_entries<const N: usize>(entries: [(&str, &str); N]) -> Self {
        Self {
            inner: MemoryStorage::with_entries(entries),
            ..Default::default()
        }
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(PokedexError::storage(key, "disk full"));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_writable(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.inner.remove(key).await
    }
}
