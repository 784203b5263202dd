use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::db::{KeyValueStorage, MemoryStorage};
use crate::error::AppResult;
use crate::services::{Catalog, Profile};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable title list
    pub catalog: Arc<Catalog>,
    /// The browser profile served by this process
    pub profile: Arc<RwLock<Profile>>,
    /// Append titles to the purchased list when a purchase is started
    pub record_purchases: bool,
}

impl AppState {
    pub fn new(catalog: Catalog, profile: Profile, record_purchases: bool) -> Self {
        Self {
            catalog: Arc::new(catalog),
            profile: Arc::new(RwLock::new(profile)),
            record_purchases,
        }
    }

    /// Builtin catalog over in-memory storage, without login latency
    pub fn in_memory() -> AppResult<Self> {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let profile = Profile::new(storage, "cinehub", Duration::ZERO);
        Ok(Self::new(Catalog::builtin()?, profile, false))
    }
}
