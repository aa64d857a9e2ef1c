use std::sync::Arc;

use crate::catalog_view::CatalogViewModel;
use crate::client::{CatalogClient, HttpCatalogClient};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::favorites_view::FavoritesViewModel;
use crate::profile::{ProfileStore, ProfileViewModel, UserProfile};
use crate::session::{self, Route, SessionState};
use crate::storage::{FileStorage, KeyValueStore};
use crate::Result;

const STORAGE_LABEL: &str = "pokedex";

/// Root of the application: owns the collaborators and the session state,
/// and hands out one view model per screen.
pub struct Pokedex<C = HttpCatalogClient, S = FileStorage> {
    config: Config,
    client: Arc<C>,
    storage: Arc<S>,
    session: SessionState,
}

impl Pokedex {
    /// Wire the HTTP client and the on-disk storage described by `config`
    /// and resolve the session.
    pub async fn open(config: Config) -> Result<Self> {
        let client = HttpCatalogClient::new(&config)?;
        let storage = FileStorage::new(STORAGE_LABEL, &config.storage_root);
        log::info!(
            "opening pokedex with catalog {} and storage {}",
            client.base_url(),
            storage.root().display()
        );
        Ok(Self::with_parts(config, Arc::new(client), Arc::new(storage)).await)
    }
}

impl<C: CatalogClient, S: KeyValueStore> Pokedex<C, S> {
    pub async fn with_parts(
        config: Config,
        client: Arc<C>,
        storage: Arc<S>,
    ) -> Self {
        let session =
            SessionState::resolve(&ProfileStore::new(storage.clone())).await;
        log::debug!("session resolved, entering {:?}", session.route());
        Self {
            config,
            client,
            storage,
            session,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn route(&self) -> Route {
        self.session.route()
    }

    pub fn favorites_store(&self) -> FavoritesStore<S> {
        FavoritesStore::new(self.storage.clone())
    }

    pub fn profile_store(&self) -> ProfileStore<S> {
        ProfileStore::new(self.storage.clone())
    }

    pub fn catalog_view(&self) -> CatalogViewModel<C, S> {
        CatalogViewModel::new(
            self.client.clone(),
            self.favorites_store(),
            self.config.catalog_limit,
        )
    }

    pub fn favorites_view(&self) -> FavoritesViewModel<C, S> {
        FavoritesViewModel::new(self.client.clone(), self.favorites_store())
    }

    pub fn profile_view(&self) -> ProfileViewModel<S> {
        ProfileViewModel::new(self.profile_store(), self.favorites_store())
    }

    /// Record the profile handed over by the login flow.
    pub async fn sign_in(&mut self, profile: UserProfile) -> Result<Route> {
        let profiles = self.profile_store();
        profiles.save(&profile).await?;
        self.session = SessionState::resolve(&profiles).await;
        Ok(self.session.route())
    }

    pub async fn logout(&mut self) -> Result<Route> {
        let (session, route) = session::logout(&self.profile_store()).await?;
        self.session = session;
        Ok(route)
    }
}
