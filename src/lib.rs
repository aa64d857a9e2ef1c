//! Core of a catalog-browsing app on top of the public PokeAPI: the remote
//! catalog client, persisted favorites and profile, and the view models of
//! the catalog, favorites and profile screens. Rendering and navigation
//! belong to the hosting UI.

pub mod app;
pub mod atomic;
pub mod catalog_view;
pub mod client;
pub mod config;
mod errors;
pub mod favorites;
pub mod favorites_view;
pub mod item;
mod load_state;
pub mod profile;
mod rollback;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Once;

pub use app::Pokedex;
pub use catalog_view::CatalogViewModel;
pub use client::{CatalogClient, HttpCatalogClient};
pub use config::Config;
pub use errors::{PokedexError, Result};
pub use favorites::{FavoriteIds, FavoritesStore};
pub use favorites_view::FavoritesViewModel;
pub use item::{category_color, CatalogItem};
pub use load_state::LoadState;
pub use profile::{ProfileStore, ProfileViewModel, UserProfile};
pub use session::{Route, SessionState};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};

static INIT: Once = Once::new();

/// Install the `env_logger` backend, honoring `RUST_LOG`. Safe to call more
/// than once.
pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(cfg!(test)).try_init();
        log::info!("Initializing pokedex");
    });
}
