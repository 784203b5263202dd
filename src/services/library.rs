use std::sync::Arc;

use crate::{
    db::{
        storage::{load_record, remove_record, save_record},
        KeyValueStorage, StorageKey,
    },
    models::{Genre, Title, User},
};

/// Per-user watchlist and purchased titles.
///
/// Lists hold copies of catalog titles in insertion order. Adding does not
/// deduplicate; the same title can appear more than once.
pub struct LibraryStore {
    storage: Arc<dyn KeyValueStorage>,
    namespace: String,
    owner: Option<String>,
    watchlist: Vec<Title>,
    purchased: Vec<Title>,
}

impl LibraryStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: &str) -> Self {
        Self {
            storage,
            namespace: namespace.to_string(),
            owner: None,
            watchlist: Vec::new(),
            purchased: Vec::new(),
        }
    }

    /// Follows a session change.
    ///
    /// With a user, that user's lists are loaded from storage (missing or corrupt
    /// records load as empty). Without one, both lists are emptied in memory and
    /// storage is left alone.
    pub async fn load_for(&mut self, user: Option<&User>) {
        self.watchlist.clear();
        self.purchased.clear();
        self.owner = None;

        let Some(user) = user else {
            return;
        };

        let storage = self.storage.as_ref();
        let watchlist_key = StorageKey::Watchlist(user.id.clone()).in_namespace(&self.namespace);
        let purchased_key = StorageKey::Purchased(user.id.clone()).in_namespace(&self.namespace);

        self.watchlist = load_record(storage, &watchlist_key)
            .await
            .unwrap_or_default();
        self.purchased = load_record(storage, &purchased_key)
            .await
            .unwrap_or_default();
        self.owner = Some(user.id.clone());

        tracing::debug!(
            user_id = %user.id,
            watchlist = self.watchlist.len(),
            purchased = self.purchased.len(),
            "Loaded library"
        );
    }

    /// Id of the user whose lists are loaded
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn watchlist(&self) -> &[Title] {
        &self.watchlist
    }

    pub fn purchased(&self) -> &[Title] {
        &self.purchased
    }

    /// Appends `title` to the watchlist. Does nothing without an active user.
    pub async fn add_to_watchlist(&mut self, title: Title) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        tracing::debug!(user_id = %owner, title_id = %title.id, "Adding to watchlist");
        self.watchlist.push(title);
        self.persist(StorageKey::Watchlist(owner), &self.watchlist)
            .await;
    }

    /// Removes every watchlist entry with `id`
    pub async fn remove_from_watchlist(&mut self, id: &str) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        self.watchlist.retain(|title| title.id != id);
        self.persist(StorageKey::Watchlist(owner), &self.watchlist)
            .await;
    }

    /// Appends `title` to the purchased list. Does nothing without an active user.
    pub async fn add_to_purchased(&mut self, title: Title) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        tracing::info!(
            user_id = %owner,
            title_id = %title.id,
            price = title.price,
            "Recording purchase"
        );
        self.purchased.push(title);
        self.persist(StorageKey::Purchased(owner), &self.purchased)
            .await;
    }

    pub fn is_in_watchlist(&self, id: &str) -> bool {
        self.watchlist.iter().any(|title| title.id == id)
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased.iter().any(|title| title.id == id)
    }

    /// Empties the watchlist and deletes its record. Purchases are kept.
    pub async fn clear_watchlist(&mut self) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        self.watchlist.clear();
        let key = StorageKey::Watchlist(owner).in_namespace(&self.namespace);
        remove_record(self.storage.as_ref(), &key).await;
    }

    pub fn watchlist_by_genre(&self, genre: Genre) -> Vec<&Title> {
        self.watchlist
            .iter()
            .filter(|title| title.genre == genre)
            .collect()
    }

    /// Sum of the prices of all purchased titles
    pub fn total_spent(&self) -> f64 {
        self.purchased.iter().map(|title| title.price).sum()
    }

    async fn persist(&self, key: StorageKey, titles: &[Title]) {
        let key = key.in_namespace(&self.namespace);
        save_record(self.storage.as_ref(), &key, titles).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStorage,
        models::{Subscription, User},
        services::Catalog,
    };
    use chrono::Utc;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: id.to_string(),
            avatar: None,
            subscription: Subscription::Free,
            join_date: Utc::now(),
        }
    }

    fn title(id: &str) -> Title {
        Catalog::builtin().unwrap().get(id).unwrap().clone()
    }

    async fn library_for(storage: Arc<MemoryStorage>, owner: &User) -> LibraryStore {
        let mut library = LibraryStore::new(storage, "cinehub");
        library.load_for(Some(owner)).await;
        library
    }

    #[tokio::test]
    async fn test_add_then_remove() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = library_for(storage, &user("u1")).await;

        library.add_to_watchlist(title("3")).await;
        assert!(library.is_in_watchlist("3"));
        assert!(!library.is_in_watchlist("4"));

        library.remove_from_watchlist("3").await;
        assert!(!library.is_in_watchlist("3"));
    }

    #[tokio::test]
    async fn test_add_does_not_deduplicate() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = library_for(storage, &user("u1")).await;

        library.add_to_watchlist(title("3")).await;
        library.add_to_watchlist(title("3")).await;
        assert_eq!(library.watchlist().len(), 2);

        library.remove_from_watchlist("3").await;
        assert!(library.watchlist().is_empty());
    }

    #[tokio::test]
    async fn test_without_user_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = LibraryStore::new(storage.clone(), "cinehub");

        library.add_to_watchlist(title("1")).await;
        library.add_to_purchased(title("1")).await;
        assert!(library.watchlist().is_empty());
        assert!(library.purchased().is_empty());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_lists_persist_per_user() {
        let storage = Arc::new(MemoryStorage::new());
        let alice = user("alice");
        let bob = user("bob");

        let mut library = library_for(storage.clone(), &alice).await;
        library.add_to_watchlist(title("1")).await;
        library.add_to_purchased(title("2")).await;

        library.load_for(Some(&bob)).await;
        assert!(library.watchlist().is_empty());
        assert!(library.purchased().is_empty());

        library.load_for(Some(&alice)).await;
        assert!(library.is_in_watchlist("1"));
        assert!(library.is_purchased("2"));
        assert!(storage
            .get("cinehub_watchlist_alice")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_reset_keeps_persisted_data() {
        let storage = Arc::new(MemoryStorage::new());
        let alice = user("alice");

        let mut library = library_for(storage.clone(), &alice).await;
        library.add_to_watchlist(title("1")).await;

        library.load_for(None).await;
        assert!(library.watchlist().is_empty());
        assert!(library.owner().is_none());
        assert!(storage
            .get("cinehub_watchlist_alice")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_corrupt_list_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set("cinehub_watchlist_alice", "not json")
            .await
            .unwrap();
        storage
            .set("cinehub_purchased_alice", "[]")
            .await
            .unwrap();

        let library = library_for(storage, &user("alice")).await;
        assert!(library.watchlist().is_empty());
        assert!(library.purchased().is_empty());
        assert_eq!(library.owner(), Some("alice"));
    }

    #[tokio::test]
    async fn test_clear_watchlist_keeps_purchases() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = library_for(storage.clone(), &user("alice")).await;
        library.add_to_watchlist(title("1")).await;
        library.add_to_purchased(title("2")).await;

        library.clear_watchlist().await;
        assert!(library.watchlist().is_empty());
        assert!(library.is_purchased("2"));
        assert_eq!(storage.get("cinehub_watchlist_alice").await.unwrap(), None);
        assert!(storage
            .get("cinehub_purchased_alice")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_total_spent_and_genre_filter() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = library_for(storage, &user("alice")).await;
        assert_eq!(library.total_spent(), 0.0);

        library.add_to_purchased(title("1")).await;
        library.add_to_purchased(title("9")).await;
        let expected = title("1").price + title("9").price;
        assert!((library.total_spent() - expected).abs() < 1e-9);

        library.add_to_watchlist(title("6")).await;
        library.add_to_watchlist(title("13")).await;
        library.add_to_watchlist(title("3")).await;
        let comedies = library.watchlist_by_genre(Genre::Comedy);
        assert_eq!(
            comedies.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["6", "13"]
        );
        assert!(library.watchlist_by_genre(Genre::Horror).is_empty());
    }
}
