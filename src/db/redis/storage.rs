use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;

use crate::db::KeyValueStorage;
use crate::error::AppResult;

/// Creates a Redis client for profile persistence
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key-value storage backed by Redis.
///
/// Keys are stored without expiry, so profile data survives server restarts the
/// same way browser local storage survives a page reload.
#[derive(Clone)]
pub struct RedisStorage {
    conn: ConnectionManager,
}

impl RedisStorage {
    /// Connects to Redis. The connection manager reconnects on its own after failures.
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis storage");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStorage for RedisStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

// These tests need a running Redis server: `cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> RedisStorage {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        RedisStorage::connect(client).await.unwrap()
    }

    #[test]
    fn test_create_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_missing_key() {
        let storage = connect().await;
        let value = storage.get("cinehub_test_missing_12345").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_set_get_delete() {
        let storage = connect().await;
        let key = "cinehub_test_watchlist_1";

        storage.set(key, r#"[{"id":"m-1"}]"#).await.unwrap();
        assert_eq!(
            storage.get(key).await.unwrap(),
            Some(r#"[{"id":"m-1"}]"#.to_string())
        );

        storage.delete(key).await.unwrap();
        assert_eq!(storage.get(key).await.unwrap(), None);
    }
}
