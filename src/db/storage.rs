use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

/// Keys under which profile state is persisted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The active session's user record
    Session,
    /// Unscoped watchlist key from before lists were keyed by user id
    LegacyWatchlist,
    /// Unscoped purchased key from before lists were keyed by user id
    LegacyPurchased,
    /// Watchlist of one user
    Watchlist(String),
    /// Purchased titles of one user
    Purchased(String),
}

impl StorageKey {
    /// Renders the key inside `namespace`, e.g. `cinehub_watchlist_42`
    pub fn in_namespace(&self, namespace: &str) -> String {
        match self {
            StorageKey::Session => format!("{}_user", namespace),
            StorageKey::LegacyWatchlist => format!("{}_watchlist", namespace),
            StorageKey::LegacyPurchased => format!("{}_purchased", namespace),
            StorageKey::Watchlist(user_id) => format!("{}_watchlist_{}", namespace, user_id),
            StorageKey::Purchased(user_id) => format!("{}_purchased_{}", namespace, user_id),
        }
    }
}

/// String key-value persistence, the equivalent of a browser's local storage.
///
/// Values are serialized JSON documents. Implementations must be cheap to share
/// behind an `Arc`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Returns the raw value stored under `key`, if any
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn backend(&self) -> &'static str;
}

/// Reads and deserializes the record under `key`.
///
/// A record that fails to parse is deleted and reported as absent. Backend
/// failures are logged and also reported as absent.
pub async fn load_record<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Option<T> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(
                error = %e,
                key = %key,
                backend = storage.backend(),
                "Storage read failed"
            );
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Discarding corrupt stored record");
            remove_record(storage, key).await;
            None
        }
    }
}

/// Serializes `value` and stores it under `key`. Failures are logged, not returned.
pub async fn save_record<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Record serialization error");
            return;
        }
    };

    if let Err(e) = storage.set(key, &json).await {
        tracing::error!(
            error = %e,
            key = %key,
            backend = storage.backend(),
            "Storage write failed"
        );
    }
}

/// Deletes the record under `key`. Failures are logged, not returned.
pub async fn remove_record(storage: &dyn KeyValueStorage, key: &str) {
    if let Err(e) = storage.delete(key).await {
        tracing::error!(
            error = %e,
            key = %key,
            backend = storage.backend(),
            "Storage delete failed"
        );
    }
}
