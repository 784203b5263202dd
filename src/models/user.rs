use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    Free,
    Premium,
}

/// The mock account of the active session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub subscription: Subscription,
    pub join_date: DateTime<Utc>,
}

/// Partial profile changes; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub subscription: Option<Subscription>,
}

impl User {
    /// Merges a partial update into this user. `id` and `join_date` never change.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(subscription) = update.subscription {
            self.subscription = subscription;
        }
    }
}
