use crate::profile::{ProfileStore, UserProfile};
use crate::storage::KeyValueStore;
use crate::Result;

/// Screen the application enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Catalog,
    /// Handled by the identity provider, outside of this crate.
    Login,
}

/// Whether a user is signed in, resolved once at startup and then passed
/// down instead of being looked up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    profile: Option<UserProfile>,
}

impl SessionState {
    /// A stored profile means a signed-in user. An unreadable profile is
    /// logged and treated as signed out.
    pub async fn resolve<S: KeyValueStore>(profiles: &ProfileStore<S>) -> Self {
        let profile = match profiles.load().await {
            Ok(profile) => profile,
            Err(e) => {
                log::error!("Error checking auth status: {}", e);
                None
            }
        };
        Self { profile }
    }

    pub fn signed_out() -> Self {
        Self { profile: None }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile.is_some()
    }

    pub fn route(&self) -> Route {
        if self.is_signed_in() {
            Route::Catalog
        } else {
            Route::Login
        }
    }
}

/// Forget the stored profile. Favorites are kept for the next sign-in.
pub async fn logout<S: KeyValueStore>(
    profiles: &ProfileStore<S>,
) -> Result<(SessionState, Route)> {
    profiles.clear().await?;
    log::info!("signed out");
    let session = SessionState::signed_out();
    let route = session.route();
    Ok((session, route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{FavoritesStore, FAVORITES_KEY};
    use crate::profile::PROFILE_KEY;
    use crate::testing::FlakyStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn stored_profile_routes_to_catalog() {
        let storage = FlakyStorage::with_entries([(
            PROFILE_KEY,
            r#"{"name":"Brock","email":"brock@pewter.gym","joinDate":""}"#,
        )]);
        let session =
            SessionState::resolve(&ProfileStore::new(Arc::new(storage))).await;

        assert_eq!(session.route(), Route::Catalog);
        assert_eq!(session.profile().unwrap().name, "Brock");
    }

    #[tokio::test]
    async fn missing_or_broken_profile_routes_to_login() {
        let empty = ProfileStore::new(Arc::new(FlakyStorage::default()));
        assert_eq!(SessionState::resolve(&empty).await.route(), Route::Login);

        let broken = ProfileStore::new(Arc::new(FlakyStorage::with_entries([
            (PROFILE_KEY, "{"),
        ])));
        assert_eq!(SessionState::resolve(&broken).await.route(), Route::Login);
    }

    #[tokio::test]
    async fn logout_clears_profile_only() {
        let storage = Arc::new(FlakyStorage::with_entries([
            (PROFILE_KEY, r#"{"name":"Brock"}"#),
            (FAVORITES_KEY, "[74,95]"),
        ]));
        let profiles = ProfileStore::new(storage.clone());

        let (session, route) = logout(&profiles).await.unwrap();

        assert_eq!(route, Route::Login);
        assert!(!session.is_signed_in());
        assert_eq!(SessionState::resolve(&profiles).await.route(), Route::Login);
        let favorites = FavoritesStore::new(storage).load().await.unwrap();
        assert_eq!(favorites.as_slice(), &[74, 95]);
    }
}
