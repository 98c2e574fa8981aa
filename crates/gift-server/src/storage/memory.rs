//! In-memory counter cache using DashMap (stands in for memcached/Redis)

use async_trait::async_trait;
use dashmap::DashMap;
use gift_core::ports::CounterCache;
use gift_core::{CacheKey, Result};
use std::sync::Arc;

/// Process-local counter cache. Entries never expire; they are only changed
/// by explicit set/increment/decrement/delete.
#[derive(Clone, Default)]
pub struct MemoryCache {
    data: Arc<DashMap<String, i64>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to an existing entry under its shard lock
    fn update(&self, key: &CacheKey, f: impl FnOnce(i64) -> i64) -> Option<i64> {
        self.data.get_mut(key.as_str()).map(|mut entry| {
            *entry = f(*entry);
            *entry
        })
    }
}

#[cfg(test)]
impl MemoryCache {
    /// Drop every entry, as a cache restart would
    pub fn flush(&self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl CounterCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<i64>> {
        Ok(self.data.get(key.as_str()).map(|entry| *entry))
    }

    async fn set(&self, key: &CacheKey, value: i64) -> Result<()> {
        self.data.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn increment(&self, key: &CacheKey) -> Result<Option<i64>> {
        Ok(self.update(key, |v| v.saturating_add(1)))
    }

    async fn decrement(&self, key: &CacheKey) -> Result<Option<i64>> {
        Ok(self.update(key, |v| (v - 1).max(0)))
    }

    async fn delete(&self, key: &CacheKey) -> Result<()> {
        self.data.remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gift_core::UserId;

    fn key(id: i64) -> CacheKey {
        CacheKey::new_gift_count(None, UserId(id))
    }

    #[tokio::test]
    async fn test_basic_operations() -> anyhow::Result<()> {
        let cache = MemoryCache::new();

        cache.set(&key(1), 3).await?;
        assert_eq!(cache.get(&key(1)).await?, Some(3));
        assert_eq!(cache.get(&key(2)).await?, None);

        cache.delete(&key(1)).await?;
        assert_eq!(cache.get(&key(1)).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_counters_do_not_create_entries() -> anyhow::Result<()> {
        let cache = MemoryCache::new();

        assert_eq!(cache.increment(&key(1)).await?, None);
        assert_eq!(cache.decrement(&key(1)).await?, None);
        assert!(cache.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_decrement_stops_at_zero() -> anyhow::Result<()> {
        let cache = MemoryCache::new();

        cache.set(&key(1), 1).await?;
        assert_eq!(cache.decrement(&key(1)).await?, Some(0));
        assert_eq!(cache.decrement(&key(1)).await?, Some(0));
        assert_eq!(cache.increment(&key(1)).await?, Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_is_a_stored_value() -> anyhow::Result<()> {
        let cache = MemoryCache::new();

        cache.set(&key(1), 0).await?;
        assert_eq!(cache.get(&key(1)).await?, Some(0));

        cache.flush();
        assert_eq!(cache.get(&key(1)).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() -> anyhow::Result<()> {
        let cache = MemoryCache::new();
        cache.set(&key(9), 0).await?;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.increment(&key(9)).await }));
        }
        for handle in handles {
            handle.await??;
        }

        assert_eq!(cache.get(&key(9)).await?, Some(50));
        Ok(())
    }
}
