// src/services/cache.rs
// DOCUMENTATION: In-memory cache for GMB location listings
// PURPOSE: Avoid re-fetching an account's locations on repeated claim attempts

use crate::models::GmbLocation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Location lists keyed by GMB account, with a TTL
pub struct LocationsCache {
    store: Arc<RwLock<HashMap<String, CacheEntry<Vec<GmbLocation>>>>>,
    default_ttl: Duration,
}

impl LocationsCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Cache key for an account resource name ("accounts/123")
    pub fn generate_key(account_name: &str) -> String {
        format!("locations:{}", account_name.trim().trim_end_matches('/'))
    }

    pub async fn get(&self, key: &str) -> Option<Vec<GmbLocation>> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    pub async fn set(&self, key: String, locations: Vec<GmbLocation>) {
        let mut store = self.store.write().await;
        log::debug!(
            "Cache SET for key: {} ({} locations, TTL: {}s)",
            key,
            locations.len(),
            self.default_ttl.as_secs()
        );
        store.insert(key, CacheEntry::new(locations, self.default_ttl));
    }

    /// Drop an account's entry, e.g. after the owner edits their GMB listing
    pub async fn invalidate(&self, key: &str) {
        let mut store = self.store.write().await;
        if store.remove(key).is_some() {
            log::debug!("Cache INVALIDATE for key: {}", key);
        }
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<LocationsCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<GmbLocation> {
        vec![GmbLocation {
            name: "accounts/1/locations/9".to_string(),
            location_name: Some("Gilbert Garage Doors".to_string()),
            address: None,
            primary_phone: None,
        }]
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = LocationsCache::new(60);
        let key = LocationsCache::generate_key("accounts/1");

        cache.set(key.clone(), sample()).await;

        assert_eq!(cache.get(&key).await, Some(sample()));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = LocationsCache::new(1);
        let key = LocationsCache::generate_key("accounts/1");

        cache.set(key.clone(), sample()).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn test_generate_key() {
        assert_eq!(
            LocationsCache::generate_key("accounts/1"),
            LocationsCache::generate_key(" accounts/1/ ")
        );
        assert_ne!(
            LocationsCache::generate_key("accounts/1"),
            LocationsCache::generate_key("accounts/2")
        );
    }

    #[test]
    fn test_invalidate() {
        tokio_test::block_on(async {
            let cache = LocationsCache::new(60);
            let key = LocationsCache::generate_key("accounts/7");

            cache.set(key.clone(), sample()).await;
            cache.invalidate(&key).await;

            assert!(cache.get(&key).await.is_none());
        });
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = LocationsCache::new(1);

        cache.set("a".to_string(), sample()).await;
        cache.set("b".to_string(), sample()).await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.active_entries, 0);
    }
}
