use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;
use crate::Result;

pub const FAVORITES_KEY: &str = "favorites";

/// Set of favorite catalog ids.
///
/// Insertion order is kept so the persisted JSON array is stable, but it
/// carries no meaning beyond that. Duplicates found in persisted data are
/// collapsed, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct FavoriteIds {
    ids: Vec<u32>,
}

impl FavoriteIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `false` if `id` was already a favorite.
    pub fn insert(&mut self, id: u32) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns `false` if `id` was not a favorite.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.ids.len();
        self.ids.retain(|other| *other != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`. Returns whether `id` is a favorite
    /// afterwards.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }
}

impl From<Vec<u32>> for FavoriteIds {
    fn from(ids: Vec<u32>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FavoriteIds> for Vec<u32> {
    fn from(favorites: FavoriteIds) -> Self {
        favorites.ids
    }
}

impl FromIterator<u32> for FavoriteIds {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut favorites = FavoriteIds::new();
        for id in iter {
            favorites.insert(id);
        }
        favorites
    }
}

/// Persisted favorite set, shared by the catalog and favorites screens.
///
/// `add`, `remove` and the view models' writes are load/mutate/save
/// sequences without locking: when two writers race, the later `save`
/// wins.
pub struct FavoritesStore<S> {
    storage: Arc<S>,
}

impl<S> Clone for FavoritesStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Read the persisted set; empty if nothing was saved yet.
    pub async fn load(&self) -> Result<FavoriteIds> {
        Ok(self
            .storage
            .get_json::<FavoriteIds>(FAVORITES_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Like [`Self::load`], but unreadable data is logged and treated as an
    /// empty set.
    pub async fn load_or_default(&self) -> FavoriteIds {
        match self.load().await {
            Ok(favorites) => favorites,
            Err(e) => {
                log::error!("favorites are unreadable, starting empty: {}", e);
                FavoriteIds::new()
            }
        }
    }

    /// Overwrite the persisted set as a whole.
    pub async fn save(&self, favorites: &FavoriteIds) -> Result<()> {
        self.storage
            .set_json(FAVORITES_KEY, favorites)
            .await?;
        log::debug!("saved {} favorites", favorites.len());
        Ok(())
    }

    /// Returns `false`, without writing, if `id` was already a favorite.
    pub async fn add(&self, id: u32) -> Result<bool> {
        let mut favorites = self.load().await?;
        if !favorites.insert(id) {
            return Ok(false);
        }
        self.save(&favorites).await?;
        Ok(true)
    }

    /// Returns `false`, without writing, if `id` was not a favorite.
    pub async fn remove(&self, id: u32) -> Result<bool> {
        let mut favorites = self.load().await?;
        if !favorites.remove(id) {
            return Ok(false);
        }
        self.save(&favorites).await?;
        Ok(true)
    }

    pub async fn contains(&self, id: u32) -> Result<bool> {
        Ok(self.load().await?.contains(id))
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }
}
