use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{
    db::{
        storage::{load_record, remove_record, save_record},
        KeyValueStorage, StorageKey,
    },
    error::{AppError, AppResult},
    models::{ProfileUpdate, Subscription, User},
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

const LOGIN_REJECTED: &str = "Invalid email or password. Password must be at least 6 characters.";
const SIGNUP_INCOMPLETE: &str = "Please fill in all fields. Password must be at least 6 characters.";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";

/// Length is counted in UTF-16 code units, so an emoji counts as two
fn password_long_enough(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LENGTH
}

/// Mock credential check for an existing account.
///
/// Waits `delay` to stand in for a network round trip, then accepts any
/// non-empty email with a long enough password.
pub async fn authenticate(email: &str, password: &str, delay: Duration) -> AppResult<User> {
    tokio::time::sleep(delay).await;

    if email.is_empty() || !password_long_enough(password) {
        tracing::info!(email = %email, "Login rejected");
        return Err(AppError::Validation(LOGIN_REJECTED.to_string()));
    }

    Ok(new_user(email, display_name_from_email(email)))
}

/// Mock account creation. The password length is checked before the simulated delay.
pub async fn register(
    email: &str,
    password: &str,
    name: &str,
    delay: Duration,
) -> AppResult<User> {
    if !password_long_enough(password) {
        return Err(AppError::Validation(PASSWORD_TOO_SHORT.to_string()));
    }

    tokio::time::sleep(delay).await;

    let name = name.trim();
    if email.is_empty() || name.is_empty() {
        tracing::info!(email = %email, "Signup rejected");
        return Err(AppError::Validation(SIGNUP_INCOMPLETE.to_string()));
    }

    Ok(new_user(email, name.to_string()))
}

fn new_user(email: &str, name: String) -> User {
    let now = Utc::now();
    User {
        id: now.timestamp_millis().to_string(),
        email: email.to_string(),
        name,
        avatar: None,
        subscription: Subscription::Free,
        join_date: now,
    }
}

/// `jane.doe@example.com` becomes `Jane.doe`
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Holds the single active mock session and keeps it persisted
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    namespace: String,
    auth_delay: Duration,
    active: Option<User>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: &str, auth_delay: Duration) -> Self {
        Self {
            storage,
            namespace: namespace.to_string(),
            auth_delay,
            active: None,
        }
    }

    fn key(&self, key: StorageKey) -> String {
        key.in_namespace(&self.namespace)
    }

    pub fn current(&self) -> Option<&User> {
        self.active.as_ref()
    }

    pub fn auth_delay(&self) -> Duration {
        self.auth_delay
    }

    /// Picks up a session persisted by an earlier run. A corrupt record is dropped.
    pub async fn restore(&mut self) -> Option<&User> {
        let key = self.key(StorageKey::Session);
        self.active = load_record::<User>(self.storage.as_ref(), &key).await;
        if let Some(user) = &self.active {
            tracing::info!(user_id = %user.id, "Restored saved session");
        }
        self.active.as_ref()
    }

    /// Makes `user` the active session and persists it.
    ///
    /// Callers get `user` from [`authenticate`] or [`register`] first.
    pub async fn activate(&mut self, user: User) -> User {
        let key = self.key(StorageKey::Session);
        save_record(self.storage.as_ref(), &key, &user).await;
        tracing::info!(user_id = %user.id, email = %user.email, "Session started");
        self.active = Some(user.clone());
        user
    }

    /// Ends the session.
    ///
    /// Besides the session record only the unscoped legacy list keys are removed;
    /// the user's own `*_watchlist_{id}` and `*_purchased_{id}` records stay.
    pub async fn logout(&mut self) {
        let ended = self.active.take();

        for key in [
            StorageKey::Session,
            StorageKey::LegacyWatchlist,
            StorageKey::LegacyPurchased,
        ] {
            let key = self.key(key);
            remove_record(self.storage.as_ref(), &key).await;
        }

        if let Some(user) = ended {
            tracing::info!(user_id = %user.id, "Session ended");
        }
    }

    /// Merges `update` into the active user. Returns `None` when nobody is signed in.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Option<User> {
        let user = self.active.as_mut()?;
        user.apply(update);
        let updated = user.clone();

        let key = self.key(StorageKey::Session);
        save_record(self.storage.as_ref(), &key, &updated).await;
        tracing::debug!(user_id = %updated.id, "Profile updated");
        Some(updated)
    }
}
