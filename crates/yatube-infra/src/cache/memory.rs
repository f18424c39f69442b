//! Process-local page cache, used when Redis is not configured or unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{Cache, CacheError};

struct Entry {
    body: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Pages kept in a map behind an async `RwLock`; lost on restart.
#[derive(Default)]
pub struct InMemoryCache {
    pages: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let pages = self.pages.read().await;
            match pages.get(key) {
                Some(entry) if entry.is_fresh(now) => return Some(entry.body.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Stale: evict, unless another writer refreshed it meanwhile.
        let mut pages = self.pages.write().await;
        if pages.get(key).is_some_and(|entry| !entry.is_fresh(now)) {
            pages.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = Entry {
            body: value.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
        };
        let mut pages = self.pages.write().await;
        // Expired keys that are never read again are only dropped here.
        pages.retain(|_, cached| cached.is_fresh(now));
        pages.insert(key.to_string(), entry);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut pages = self.pages.write().await;
        let dropped = pages.len();
        pages.clear();
        tracing::debug!(dropped, "In-memory page cache cleared");
        Ok(())
    }
}
