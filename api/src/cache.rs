//! Time-bounded cache of the last generated catalog
//!
//! Owned by [`crate::AppState`], so every server instance has its own. Failed
//! runs are never cached.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use superchain_catalog::AggregatedGroup;

/// Shared, immutable catalog snapshot
pub type Catalog = Arc<Vec<AggregatedGroup>>;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Catalog,
    cached_at: Instant,
}

/// Catalog cache with a fixed TTL. A zero TTL disables it.
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// The cached catalog, if present and younger than the TTL
    pub async fn get(&self) -> Option<Catalog> {
        if !self.is_enabled() {
            return None;
        }

        let entry = self.entry.read().await;
        match entry.as_ref() {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                debug!(age_ms = entry.cached_at.elapsed().as_millis(), "Catalog cache hit");
                Some(entry.value.clone())
            }
            _ => None,
        }
    }

    pub async fn insert(&self, value: Catalog) {
        if !self.is_enabled() {
            return;
        }

        *self.entry.write().await = Some(CacheEntry {
            value,
            cached_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_stores_nothing() {
        let cache = CatalogCache::new(Duration::ZERO);
        cache.insert(Arc::new(Vec::new())).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_entry_served_until_expiry() {
        let cache = CatalogCache::new(Duration::from_millis(50));
        assert!(cache.get().await.is_none());

        cache.insert(Arc::new(Vec::new())).await;
        assert!(cache.get().await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get().await.is_none());
    }
}
