//! New-gift tally: cache-aside counter of unread gifts per recipient
//!
//! The cache is a derived view of `COUNT(unread)` in storage. Writes to it are
//! best effort; reads fall back to storage on a miss and repopulate the
//! cache before returning.

use gift_core::ports::{CounterCache, UserGiftStore};
use gift_core::{CacheKey, Result, UserId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a tally value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSource {
    Cache,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallyLookup {
    pub count: u64,
    pub source: CountSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TallyStats {
    pub hits: u64,
    pub misses: u64,
    pub cache_errors: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    cache_errors: AtomicU64,
}

pub struct GiftTallyCache {
    cache: Arc<dyn CounterCache>,
    store: Arc<dyn UserGiftStore>,
    key_prefix: Option<String>,
    counters: Counters,
}

impl GiftTallyCache {
    pub fn new(
        cache: Arc<dyn CounterCache>,
        store: Arc<dyn UserGiftStore>,
        key_prefix: Option<String>,
    ) -> Self {
        Self {
            cache,
            store,
            key_prefix,
            counters: Counters::default(),
        }
    }

    fn key(&self, user_id: UserId) -> CacheKey {
        CacheKey::new_gift_count(self.key_prefix.as_deref(), user_id)
    }

    fn cache_failed(&self, op: &str, key: &CacheKey, e: &gift_core::GiftError) {
        self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
        warn!("Cache {} failed for {}: {}", op, key, e);
    }

    /// Bump the cached count. A cold key stays cold.
    pub async fn increment(&self, user_id: UserId) {
        let key = self.key(user_id);
        match self.cache.increment(&key).await {
            Ok(Some(value)) => debug!("New gift count for {} incremented to {}", user_id, value),
            Ok(None) => debug!("New gift count for {} not cached, increment skipped", user_id),
            Err(e) => self.cache_failed("increment", &key, &e),
        }
    }

    pub async fn decrement(&self, user_id: UserId) {
        let key = self.key(user_id);
        match self.cache.decrement(&key).await {
            Ok(Some(value)) => debug!("New gift count for {} decremented to {}", user_id, value),
            Ok(None) => debug!("New gift count for {} not cached, decrement skipped", user_id),
            Err(e) => self.cache_failed("decrement", &key, &e),
        }
    }

    /// Set the cached count to zero after a bulk mark-as-read
    pub async fn clear(&self, user_id: UserId) {
        let key = self.key(user_id);
        if let Err(e) = self.cache.set(&key, 0).await {
            self.cache_failed("clear", &key, &e);
        }
    }

    pub async fn get(&self, user_id: UserId) -> Result<u64> {
        Ok(self.lookup(user_id).await?.count)
    }

    /// Cached value on a hit, otherwise recount from storage and store the
    /// result before returning. A cached zero is a hit.
    pub async fn lookup(&self, user_id: UserId) -> Result<TallyLookup> {
        let key = self.key(user_id);
        match self.cache.get(&key).await {
            Ok(Some(value)) if value >= 0 => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Got new gift count of {} for id {} from cache", value, user_id);
                return Ok(TallyLookup {
                    count: value.unsigned_abs(),
                    source: CountSource::Cache,
                });
            }
            Ok(Some(value)) => warn!("Discarding negative cached count {} for {}", value, key),
            Ok(None) => {}
            Err(e) => self.cache_failed("get", &key, &e),
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let count = self.recount_into(&key, user_id).await?;
        Ok(TallyLookup {
            count,
            source: CountSource::Storage,
        })
    }

    /// Recompute from storage and overwrite the cache entry
    pub async fn recount(&self, user_id: UserId) -> Result<u64> {
        let key = self.key(user_id);
        self.recount_into(&key, user_id).await
    }

    async fn recount_into(&self, key: &CacheKey, user_id: UserId) -> Result<u64> {
        let count = self.store.count_unread(user_id).await?;
        debug!("Got new gift count of {} for id {} from DB", count, user_id);

        let value = i64::try_from(count).unwrap_or(i64::MAX);
        if let Err(e) = self.cache.set(key, value).await {
            self.cache_failed("set", key, &e);
        }
        Ok(count)
    }

    pub fn stats(&self) -> TallyStats {
        TallyStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            cache_errors: self.counters.cache_errors.load(Ordering::Relaxed),
        }
    }
}
