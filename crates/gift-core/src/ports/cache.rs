//! Counter cache trait

use crate::{CacheKey, Result};
use async_trait::async_trait;

/// Best-effort integer key-value cache.
///
/// Entries may disappear at any time. `increment` and `decrement` are atomic
/// per key and never create an entry: they return `None` when the key is
/// absent. `decrement` stops at zero.
#[async_trait]
pub trait CounterCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<i64>>;
    async fn set(&self, key: &CacheKey, value: i64) -> Result<()>;
    async fn increment(&self, key: &CacheKey) -> Result<Option<i64>>;
    async fn decrement(&self, key: &CacheKey) -> Result<Option<i64>>;
    async fn delete(&self, key: &CacheKey) -> Result<()>;
}
