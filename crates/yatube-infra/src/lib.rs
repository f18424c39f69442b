//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`:
//! storage, page cache, media files and authentication.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `redis` - Redis page cache

pub mod auth;
pub mod cache;
pub mod media;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use media::{FileSystemMediaStorage, InMemoryMediaStorage};
pub use memory::InMemoryStore;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, postgres_repositories};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
