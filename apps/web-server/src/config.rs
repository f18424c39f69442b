//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use yatube_core::services::DEFAULT_POSTS_PER_PAGE;

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

/// Database pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sync_schema: bool,
}

/// Staff account created at startup when `ADMIN_USERNAME` and `ADMIN_PASSWORD` are set.
#[derive(Clone)]
pub struct SuperuserSettings {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SuperuserSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperuserSettings")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Knobs the page handlers read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteSettings {
    pub posts_per_page: u64,
    pub index_cache_seconds: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            index_cache_seconds: 20,
        }
    }
}

impl SiteSettings {
    pub fn index_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.index_cache_seconds)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub redis_url: Option<String>,
    pub media_root: PathBuf,
    pub superuser: Option<SuperuserSettings>,
    pub site: SiteSettings,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
            sync_schema: flag("DB_SYNC_SCHEMA", true),
        });

        let superuser = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(SuperuserSettings {
                email: env::var("ADMIN_EMAIL").unwrap_or_default(),
                username,
                password,
            }),
            _ => None,
        };

        let defaults = SiteSettings::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            superuser,
            site: SiteSettings {
                posts_per_page: parsed("POSTS_PER_PAGE", defaults.posts_per_page),
                index_cache_seconds: parsed("INDEX_CACHE_SECONDS", defaults.index_cache_seconds),
            },
        }
    }
}
