use std::sync::Arc;

use futures::future::join_all;

use crate::client::CatalogClient;
use crate::favorites::FavoritesStore;
use crate::item::CatalogItem;
use crate::load_state::LoadState;
use crate::storage::KeyValueStore;
use crate::Result;

/// State behind the favorites screen.
///
/// The persisted set may change on the catalog screen at any time, so the
/// hosting UI calls [`refresh`](Self::refresh) on every activation, not
/// only on the first one.
pub struct FavoritesViewModel<C, S> {
    client: Arc<C>,
    favorites_store: FavoritesStore<S>,
    state: LoadState,
    items: Vec<CatalogItem>,
    unresolved: Vec<u32>,
}

impl<C: CatalogClient, S: KeyValueStore> FavoritesViewModel<C, S> {
    pub fn new(client: Arc<C>, favorites_store: FavoritesStore<S>) -> Self {
        Self {
            client,
            favorites_store,
            state: LoadState::Idle,
            items: vec![],
            unresolved: vec![],
        }
    }

    /// Reload the persisted set and resolve every id against the remote
    /// catalog, concurrently.
    ///
    /// Ids that fail to resolve are left out of [`items`](Self::items) for
    /// this refresh and listed in [`unresolved`](Self::unresolved); they
    /// stay in the persisted set.
    pub async fn refresh(&mut self) {
        self.state = LoadState::Loading;

        let favorites = match self.favorites_store.load().await {
            Ok(favorites) => favorites,
            Err(e) => {
                log::error!("Error loading favorites: {}", e);
                self.items.clear();
                self.unresolved.clear();
                self.state = LoadState::Error(e.to_string());
                return;
            }
        };

        let client = &self.client;
        let resolved = join_all(
            favorites
                .iter()
                .map(|id| async move { (id, client.fetch_item_by_id(id).await) }),
        )
        .await;

        let mut items = Vec::with_capacity(resolved.len());
        let mut unresolved = vec![];
        for (id, result) in resolved {
            match result {
                Ok(item) => items.push(item),
                Err(e) => {
                    log::warn!("favorite {} is unresolved: {}", id, e);
                    unresolved.push(id);
                }
            }
        }
        log::info!(
            "{} favorites resolved, {} unresolved",
            items.len(),
            unresolved.len()
        );

        self.items = items;
        self.unresolved = unresolved;
        self.state = LoadState::Ready;
    }

    /// Remove `id` from the persisted set, then from the displayed list.
    ///
    /// If the store can't be updated, the list is left as it was.
    pub async fn remove(&mut self, id: u32) -> Result<()> {
        if let Err(e) = self.favorites_store.remove(id).await {
            log::error!("Error removing favorite {}: {}", id, e);
            return Err(e);
        }
        self.items.retain(|item| item.id != id);
        self.unresolved.retain(|other| *other != id);
        Ok(())
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Resolved favorites, in persisted order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Favorites that couldn't be resolved during the last refresh.
    pub fn unresolved(&self) -> &[u32] {
        &self.unresolved
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Header line of a non-empty list.
    pub fn summary(&self) -> Option<String> {
        match self.items.len() {
            0 => None,
            n => Some(format!("{n} Pokémon in your collection")),
        }
    }
}
