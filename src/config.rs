use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Redis connection URL. Profile data stays in memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Prefix of every persisted key (e.g. `cinehub_user`)
    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,

    /// Artificial latency of the mock login/signup calls, in milliseconds
    #[serde(default = "default_auth_delay_ms")]
    pub auth_delay_ms: u64,

    /// Append purchased titles to the user's library when a purchase is started
    #[serde(default)]
    pub record_purchases: bool,

    /// Emit logs as JSON lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_namespace() -> String {
    "cinehub".to_string()
}

fn default_auth_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redis_url: None,
            storage_namespace: default_storage_namespace(),
            auth_delay_ms: default_auth_delay_ms(),
            record_purchases: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
