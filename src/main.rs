use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinehub::api::{create_router, AppState};
use cinehub::config::Config;
use cinehub::db::{create_redis_client, KeyValueStorage, MemoryStorage, RedisStorage};
use cinehub::services::{Catalog, Profile};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cinehub=info,tower_http=info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStorage>> {
    match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            Ok(Arc::new(RedisStorage::connect(client).await?))
        }
        None => {
            tracing::warn!("REDIS_URL not set, profile data will not survive a restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let storage = open_storage(&config).await?;
    tracing::info!(backend = storage.backend(), "Storage ready");

    let catalog = Catalog::builtin()?;
    let mut profile = Profile::new(storage, &config.storage_namespace, config.auth_delay());
    profile.restore().await;

    let state = AppState::new(catalog, profile, config.record_purchases);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
