use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::KeyValueStorage,
    models::{ProfileUpdate, User},
};

use super::{LibraryStore, SessionStore};

/// One browser profile: the active session plus that user's library.
///
/// Every session change goes through here so the library is always loaded for
/// the user that is signed in, and empty when nobody is.
pub struct Profile {
    pub session: SessionStore,
    pub library: LibraryStore,
}

impl Profile {
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: &str, auth_delay: Duration) -> Self {
        Self {
            session: SessionStore::new(storage.clone(), namespace, auth_delay),
            library: LibraryStore::new(storage, namespace),
        }
    }

    /// Restores a persisted session, if any, and loads its library
    pub async fn restore(&mut self) -> Option<User> {
        let user = self.session.restore().await.cloned();
        self.library.load_for(user.as_ref()).await;
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// Switches to an already authenticated user
    pub async fn activate(&mut self, user: User) -> User {
        let user = self.session.activate(user).await;
        self.library.load_for(Some(&user)).await;
        user
    }

    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.library.load_for(None).await;
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Option<User> {
        self.session.update_profile(update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStorage,
        error::{AppError, AppResult},
        services::{session, Catalog},
    };

    fn profile(storage: Arc<MemoryStorage>) -> Profile {
        Profile::new(storage, "cinehub", Duration::ZERO)
    }

    async fn login(profile: &mut Profile, email: &str, password: &str) -> AppResult<User> {
        let user = session::authenticate(email, password, Duration::ZERO).await?;
        Ok(profile.activate(user).await)
    }

    #[tokio::test]
    async fn test_logout_empties_library_but_keeps_records() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = Catalog::builtin().unwrap();
        let mut profile = profile(storage.clone());

        let user = login(&mut profile, "jane@example.com", "secret1")
            .await
            .unwrap();
        profile
            .library
            .add_to_watchlist(catalog.get("1").unwrap().clone())
            .await;

        profile.logout().await;
        assert!(profile.current_user().is_none());
        assert!(profile.library.watchlist().is_empty());
        assert!(!profile.library.is_in_watchlist("1"));

        let key = format!("cinehub_watchlist_{}", user.id);
        assert!(storage.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_again_reloads_library() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = Catalog::builtin().unwrap();
        let mut profile = profile(storage);

        let user = login(&mut profile, "jane@example.com", "secret1")
            .await
            .unwrap();
        profile
            .library
            .add_to_watchlist(catalog.get("8").unwrap().clone())
            .await;
        profile.logout().await;

        // Same id as before, as a restored session would have
        profile.activate(user).await;
        assert!(profile.library.is_in_watchlist("8"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_session() {
        let mut profile = profile(Arc::new(MemoryStorage::new()));
        let user = login(&mut profile, "jane@example.com", "secret1")
            .await
            .unwrap();

        let result = login(&mut profile, "jane@example.com", "123").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(profile.current_user(), Some(&user));
        assert_eq!(profile.library.owner(), Some(user.id.as_str()));
    }

    #[tokio::test]
    async fn test_restore_loads_library() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = Catalog::builtin().unwrap();

        let mut first = profile(storage.clone());
        let user = session::register("jane@example.com", "secret1", "Jane", Duration::ZERO)
            .await
            .unwrap();
        first.activate(user).await;
        first
            .library
            .add_to_purchased(catalog.get("2").unwrap().clone())
            .await;

        let mut second = profile(storage);
        let restored = second.restore().await.unwrap();
        assert_eq!(restored.name, "Jane");
        assert!(second.library.is_purchased("2"));
    }
}
