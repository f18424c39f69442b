//! Response cache port.

use async_trait::async_trait;
use std::time::Duration;

/// Key/value store for rendered pages.
///
/// Reads never fail: an unreachable backend behaves like an empty cache and
/// the page is rendered again.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value`; with a `ttl` it disappears once the window passes.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Invalidate every cached page at once.
    async fn clear(&self) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unreachable: {0}")]
    Connection(String),

    #[error("Cache command failed: {0}")]
    Operation(String),
}
