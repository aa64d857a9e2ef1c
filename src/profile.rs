use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::favorites::FavoritesStore;
use crate::storage::KeyValueStore;
use crate::{PokedexError, Result};

pub const PROFILE_KEY: &str = "user";

/// Shown while the profile has no display name.
pub const DEFAULT_DISPLAY_NAME: &str = "Pokémon Trainer";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "joinDate", default)]
    pub join_date: String,
}

/// Persisted user profile. Its lifecycle is independent of the favorites:
/// clearing one never touches the other.
pub struct ProfileStore<S> {
    storage: Arc<S>,
}

impl<S> Clone for ProfileStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// `Ok(None)` if no profile was ever saved (or it was cleared).
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        self.storage.get_json(PROFILE_KEY).await
    }

    /// Rejects profiles without a display name.
    pub async fn save(&self, profile: &UserProfile) -> Result<()> {
        if profile.name.trim().is_empty() {
            return Err(PokedexError::InvalidInput(
                "display name must not be empty".to_owned(),
            ));
        }
        self.storage.set_json(PROFILE_KEY, profile).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(PROFILE_KEY).await
    }
}

/// State behind the profile screen: the stored profile, an in-progress
/// name edit and the number of favorites.
pub struct ProfileViewModel<S> {
    profiles: ProfileStore<S>,
    favorites: FavoritesStore<S>,
    profile: UserProfile,
    favorite_count: usize,
    draft_name: Option<String>,
}

impl<S: KeyValueStore> ProfileViewModel<S> {
    pub fn new(
        profiles: ProfileStore<S>,
        favorites: FavoritesStore<S>,
    ) -> Self {
        Self {
            profiles,
            favorites,
            profile: UserProfile::default(),
            favorite_count: 0,
            draft_name: None,
        }
    }

    /// Load the profile and the favorite count. Failures are logged and
    /// leave the previous values in place.
    pub async fn load(&mut self) {
        match self.profiles.load().await {
            Ok(Some(profile)) => self.profile = profile,
            Ok(None) => log::debug!("no stored profile"),
            Err(e) => log::error!("Error loading user data: {}", e),
        }
        match self.favorites.count().await {
            Ok(count) => self.favorite_count = count,
            Err(e) => log::error!("Error loading favorite count: {}", e),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn display_name(&self) -> &str {
        if self.profile.name.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.profile.name
        }
    }

    /// Stored join date, or today's date when none was recorded.
    pub fn join_date(&self) -> String {
        if self.profile.join_date.is_empty() {
            chrono::Local::now().format("%Y-%m-%d").to_string()
        } else {
            self.profile.join_date.clone()
        }
    }

    pub fn favorite_count(&self) -> usize {
        self.favorite_count
    }

    pub fn is_editing(&self) -> bool {
        self.draft_name.is_some()
    }

    pub fn draft_name(&self) -> Option<&str> {
        self.draft_name.as_deref()
    }

    pub fn begin_edit(&mut self) {
        self.draft_name = Some(self.profile.name.clone());
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.draft_name.as_mut() {
            *draft = name.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft_name = None;
    }

    /// Persist the drafted name. The displayed profile only changes once the
    /// store accepted it; on failure the edit stays open.
    pub async fn save_edit(&mut self) -> Result<()> {
        let Some(draft) = self.draft_name.as_ref() else {
            return Ok(());
        };
        let updated = UserProfile {
            name: draft.clone(),
            ..self.profile.clone()
        };
        if let Err(e) = self.profiles.save(&updated).await {
            log::error!("Error saving user data: {}", e);
            return Err(e);
        }
        self.profile = updated;
        self.draft_name = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FAVORITES_KEY;
    use crate::testing::FlakyStorage;

    const ASH: &str =
        r#"{"name":"Ash","email":"ash@pallet.town","joinDate":"1997-04-01"}"#;

    fn view_model(
        storage: FlakyStorage,
    ) -> (ProfileViewModel<FlakyStorage>, Arc<FlakyStorage>) {
        crate::initialize();
        let storage = Arc::new(storage);
        let view = ProfileViewModel::new(
            ProfileStore::new(storage.clone()),
            FavoritesStore::new(storage.clone()),
        );
        (view, storage)
    }

    #[tokio::test]
    async fn profile_json_uses_join_date_key() {
        let storage = Arc::new(FlakyStorage::default());
        let store = ProfileStore::new(storage.clone());
        let profile = UserProfile {
            name: "Misty".to_owned(),
            email: "misty@cerulean.gym".to_owned(),
            join_date: "1997-04-01".to_owned(),
        };

        store.save(&profile).await.unwrap();

        let raw = storage.get(PROFILE_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""joinDate":"1997-04-01""#));
        assert_eq!(store.load().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let store = ProfileStore::new(Arc::new(FlakyStorage::default()));
        let profile = UserProfile {
            name: "  ".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            store.save(&profile).await,
            Err(PokedexError::InvalidInput(_))
        ));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_keeps_favorites() {
        let storage = Arc::new(FlakyStorage::with_entries([
            (PROFILE_KEY, ASH),
            (FAVORITES_KEY, "[1,4]"),
        ]));
        let store = ProfileStore::new(storage.clone());

        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(
            FavoritesStore::new(storage).count().await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn load_shows_profile_and_favorite_count() {
        let (mut view, _) = view_model(FlakyStorage::with_entries([
            (PROFILE_KEY, ASH),
            (FAVORITES_KEY, "[25,1,4]"),
        ]));

        view.load().await;

        assert_eq!(view.display_name(), "Ash");
        assert_eq!(view.join_date(), "1997-04-01");
        assert_eq!(view.favorite_count(), 3);
    }

    #[tokio::test]
    async fn fallbacks_without_profile() {
        let (mut view, _) = view_model(FlakyStorage::default());
        view.load().await;

        assert_eq!(view.display_name(), DEFAULT_DISPLAY_NAME);
        assert_eq!(view.join_date().len(), "2024-01-01".len());
        assert_eq!(view.favorite_count(), 0);
    }

    #[tokio::test]
    async fn edit_save_and_cancel() {
        let (mut view, storage) =
            view_model(FlakyStorage::with_entries([(PROFILE_KEY, ASH)]));
        view.load().await;

        view.begin_edit();
        view.set_draft_name("Red");
        view.cancel_edit();
        assert_eq!(view.display_name(), "Ash");
        assert!(!view.is_editing());

        view.begin_edit();
        assert_eq!(view.draft_name(), Some("Ash"));
        view.set_draft_name("Red");
        view.save_edit().await.unwrap();

        assert_eq!(view.display_name(), "Red");
        let stored = ProfileStore::new(storage).load().await.unwrap().unwrap();
        assert_eq!(stored.name, "Red");
        assert_eq!(stored.email, "ash@pallet.town");
    }

    #[tokio::test]
    async fn failed_save_keeps_edit_open() {
        let (mut view, storage) =
            view_model(FlakyStorage::with_entries([(PROFILE_KEY, ASH)]));
        view.load().await;
        storage.set_read_only(true);

        view.begin_edit();
        view.set_draft_name("Red");
        assert!(view.save_edit().await.is_err());

        assert_eq!(view.display_name(), "Ash");
        assert_eq!(view.draft_name(), Some("Red"));
    }
}
