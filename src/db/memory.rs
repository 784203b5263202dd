use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppResult;

use super::KeyValueStorage;

/// Process-local storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty().await);

        storage.set("cinehub_user", "{}").await.unwrap();
        assert_eq!(
            storage.get("cinehub_user").await.unwrap(),
            Some("{}".to_string())
        );

        storage.set("cinehub_user", "[]").await.unwrap();
        assert_eq!(storage.len().await, 1);
        assert_eq!(
            storage.get("cinehub_user").await.unwrap(),
            Some("[]".to_string())
        );

        storage.delete("cinehub_user").await.unwrap();
        assert_eq!(storage.get("cinehub_user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        tokio_test::assert_ok!(storage.delete("missing").await);
    }
}
