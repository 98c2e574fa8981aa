//! Storage layer
//!
//! Uses SQLite (embedded) for the gift tables. The new-gift counters live in
//! a DashMap (in-memory) cache by default, or in Redis when configured.

pub mod db;
pub mod memory;
pub mod redis_cache;

pub use db::Database;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
