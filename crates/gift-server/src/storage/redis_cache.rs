//! Redis counter cache
//!
//! Increment and decrement run as Lua scripts so that an absent key stays
//! absent (memcached `incr`/`decr` behaviour) instead of being created at 0.

use async_trait::async_trait;
use gift_core::ports::CounterCache;
use gift_core::{CacheKey, GiftError, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

const INCREMENT_IF_PRESENT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('INCR', KEYS[1])
end
return false
"#;

const DECREMENT_IF_PRESENT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    local value = tonumber(redis.call('GET', KEYS[1])) or 0
    if value <= 0 then
        redis.call('SET', KEYS[1], 0)
        return 0
    end
    return redis.call('DECR', KEYS[1])
end
return false
"#;

pub struct RedisCache {
    conn: ConnectionManager,
    increment: Script,
    decrement: Script,
}

impl RedisCache {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        tracing::info!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            increment: Script::new(INCREMENT_IF_PRESENT),
            decrement: Script::new(DECREMENT_IF_PRESENT),
        })
    }
}

fn cache_error(e: redis::RedisError) -> GiftError {
    GiftError::Cache(e.to_string())
}

#[async_trait]
impl CounterCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        conn.get(key.as_str()).await.map_err(cache_error)
    }

    async fn set(&self, key: &CacheKey, value: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set(key.as_str(), value).await.map_err(cache_error)
    }

    async fn increment(&self, key: &CacheKey) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        self.increment
            .key(key.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)
    }

    async fn decrement(&self, key: &CacheKey) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        self.decrement
            .key(key.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)
    }

    async fn delete(&self, key: &CacheKey) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del(key.as_str()).await.map_err(cache_error)
    }
}
