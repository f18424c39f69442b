//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use yatube_core::ports::{Cache, MediaStorage, TokenService};
use yatube_core::{Accounts, Blog, Repositories};
use yatube_infra::{
    Argon2PasswordService, FileSystemMediaStorage, InMemoryCache, InMemoryMediaStorage,
    InMemoryStore, JwtConfig, JwtTokenService,
};

use crate::config::{AppConfig, SiteSettings};

/// Which storage backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Postgres,
    Memory,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::Postgres => "postgres",
            StorageMode::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Blog,
    pub accounts: Accounts,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub media: Arc<dyn MediaStorage>,
    pub settings: SiteSettings,
    pub storage: StorageMode,
    pub cache_backend: &'static str,
}

impl AppState {
    fn assemble(
        repos: Repositories,
        storage: StorageMode,
        cache: Arc<dyn Cache>,
        cache_backend: &'static str,
        media: Arc<dyn MediaStorage>,
        tokens: Arc<dyn TokenService>,
        settings: SiteSettings,
    ) -> Self {
        let accounts = Accounts::new(repos.users.clone(), Arc::new(Argon2PasswordService::new()));
        let blog = Blog::new(repos, media.clone(), settings.posts_per_page);
        Self {
            blog,
            accounts,
            cache,
            tokens,
            media,
            settings,
            storage,
            cache_backend,
        }
    }

    /// Fully in-memory state: no database, no Redis, no files on disk.
    pub fn in_memory(settings: SiteSettings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::assemble(
            store.repositories(),
            StorageMode::Memory,
            Arc::new(InMemoryCache::new()),
            "memory",
            Arc::new(InMemoryMediaStorage::new()),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            settings,
        )
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let (repos, storage) = repositories(config).await;
        let (cache, cache_backend) = cache(config).await?;

        let media = FileSystemMediaStorage::new(config.media_root.clone());
        tracing::info!(root = %config.media_root.display(), "Media storage ready");

        let state = Self::assemble(
            repos,
            storage,
            cache,
            cache_backend,
            Arc::new(media),
            Arc::new(JwtTokenService::from_env()),
            config.site,
        );

        if let Some(admin) = &config.superuser {
            state
                .accounts
                .ensure_superuser(&admin.username, &admin.email, &admin.password)
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
        }

        tracing::info!(
            storage = storage.as_str(),
            cache = cache_backend,
            "Application state initialized"
        );
        Ok(state)
    }
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> (Repositories, StorageMode) {
    use yatube_infra::{DatabaseConfig, database, postgres_repositories};

    let Some(settings) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (Arc::new(InMemoryStore::new()).repositories(), StorageMode::Memory);
    };

    let db_config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
        sync_schema: settings.sync_schema,
    };
    match database::connect(&db_config).await {
        Ok(db) => (postgres_repositories(&db), StorageMode::Postgres),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            (Arc::new(InMemoryStore::new()).repositories(), StorageMode::Memory)
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> (Repositories, StorageMode) {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    (Arc::new(InMemoryStore::new()).repositories(), StorageMode::Memory)
}

#[cfg(feature = "redis")]
async fn cache(config: &AppConfig) -> io::Result<(Arc<dyn Cache>, &'static str)> {
    use yatube_infra::{RedisCache, RedisConfig};

    let Some(url) = &config.redis_url else {
        return Ok((Arc::new(InMemoryCache::new()), "memory"));
    };

    let redis_config = RedisConfig::from_env(url.clone());
    let fallback = redis_config.fallback_to_memory;
    match RedisCache::new(redis_config).await {
        Ok(cache) => Ok((Arc::new(cache), "redis")),
        Err(e) if fallback => {
            tracing::warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
            Ok((Arc::new(InMemoryCache::new()), "memory"))
        }
        Err(e) => Err(io::Error::other(e.to_string())),
    }
}

#[cfg(not(feature = "redis"))]
async fn cache(config: &AppConfig) -> io::Result<(Arc<dyn Cache>, &'static str)> {
    if config.redis_url.is_some() {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled");
    }
    Ok((Arc::new(InMemoryCache::new()), "memory"))
}
