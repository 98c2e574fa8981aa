//! Gift Core Library
//!
//! Error type, storage/cache/notification port traits and the cache key
//! namespace used by the gift services.

// Re-export pure types from gift-types
pub use gift_types::*;

pub mod error;
pub mod keys;
pub mod ports;

pub use error::{GiftError, Result};
pub use keys::CacheKey;
