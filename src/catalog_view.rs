use std::sync::Arc;

use crate::client::CatalogClient;
use crate::favorites::{FavoriteIds, FavoritesStore};
use crate::item::CatalogItem;
use crate::load_state::LoadState;
use crate::rollback::Rollback;
use crate::storage::KeyValueStore;
use crate::{PokedexError, Result};

/// State behind the catalog screen: the fetched catalog, the search-filtered
/// view of it and the favorite marks.
///
/// `Idle -> Loading -> Ready` on [`activate`](Self::activate),
/// `Loading -> Error` when the catalog can't be fetched, and back to
/// `Loading` only through [`retry`](Self::retry).
pub struct CatalogViewModel<C, S> {
    client: Arc<C>,
    favorites_store: FavoritesStore<S>,
    limit: u32,
    state: LoadState,
    catalog: Vec<CatalogItem>,
    /// Indices into `catalog`, ascending.
    filtered: Vec<usize>,
    query: String,
    favorites: FavoriteIds,
}

impl<C: CatalogClient, S: KeyValueStore> CatalogViewModel<C, S> {
    pub fn new(
        client: Arc<C>,
        favorites_store: FavoritesStore<S>,
        limit: u32,
    ) -> Self {
        Self {
            client,
            favorites_store,
            limit,
            state: LoadState::Idle,
            catalog: vec![],
            filtered: vec![],
            query: String::new(),
            favorites: FavoriteIds::new(),
        }
    }

    /// First load of the screen. Does nothing once the catalog is `Ready` or
    /// in `Error`; a load that was cancelled half way starts over.
    pub async fn activate(&mut self) {
        match self.state {
            LoadState::Idle | LoadState::Loading => self.load().await,
            LoadState::Ready | LoadState::Error(_) => {
                log::debug!("catalog already activated ({:?})", self.state)
            }
        }
    }

    /// Fetch again after a failure. No-op in any other state.
    pub async fn retry(&mut self) {
        if let LoadState::Error(_) = self.state {
            self.load().await
        }
    }

    async fn load(&mut self) {
        self.state = LoadState::Loading;
        self.favorites = self.favorites_store.load_or_default().await;

        match self.client.fetch_catalog_page(self.limit).await {
            Ok(catalog) => {
                log::info!("catalog ready with {} items", catalog.len());
                self.catalog = catalog;
                self.refilter();
                self.state = LoadState::Ready;
            }
            Err(e) => {
                log::error!("Error fetching catalog: {}", e);
                self.catalog.clear();
                self.filtered.clear();
                self.state = LoadState::Error(e.to_string());
            }
        }
    }

    /// Re-read the persisted favorites, e.g. when the screen regains focus
    /// after the favorites screen removed some.
    pub async fn sync_favorites(&mut self) {
        self.favorites = self.favorites_store.load_or_default().await;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        let indices = 0..self.catalog.len();
        self.filtered = if self.query.trim().is_empty() {
            indices.collect()
        } else {
            let needle = self.query.to_lowercase();
            indices
                .filter(|&i| self.catalog[i].matches(&needle))
                .collect()
        };
    }

    /// Flip the favorite mark of `id` and persist the whole set.
    ///
    /// The in-memory mark flips before the set is persisted, but the
    /// `&mut self` borrow keeps it unobservable until the save settles:
    /// callers see either the committed mark or, when persisting fails or
    /// the call is dropped midway, the previous marks. Returns whether `id`
    /// is a favorite afterwards.
    pub async fn toggle_favorite(&mut self, id: u32) -> Result<bool> {
        // Unresolvable ids may still be unmarked, but new marks need an item.
        if !self.favorites.contains(id) && self.item(id).is_none() {
            return Err(PokedexError::InvalidInput(format!(
                "{id} is not in the catalog"
            )));
        }

        let (pending, now_favorite) =
            Rollback::apply(&mut self.favorites, |favorites| {
                favorites.toggle(id)
            });
        let saved = self.favorites_store.save(pending.current()).await;
        match saved {
            Ok(()) => {
                pending.commit();
                log::debug!("favorite {} is now {}", id, now_favorite);
                Ok(now_favorite)
            }
            Err(e) => {
                drop(pending);
                log::error!("Error saving favorite {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    /// Items matching the search query, in catalog order.
    pub fn filtered(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.filtered.iter().map(|&i| &self.catalog[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn item(&self, id: u32) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites(&self) -> &FavoriteIds {
        &self.favorites
    }
}
