//! Cache key namespace
//!
//! Keys are colon-joined components with an optional installation prefix,
//! e.g. `wikidb:user_gifts:new_count:42`.

use gift_types::UserId;
use std::fmt;

pub const USER_GIFTS_SCOPE: &str = "user_gifts";
pub const NEW_COUNT_METRIC: &str = "new_count";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a prefix and components. Empty prefixes are skipped.
    pub fn make(prefix: Option<&str>, components: &[&str]) -> Self {
        let mut parts: Vec<&str> = Vec::with_capacity(components.len() + 1);
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            parts.push(prefix);
        }
        parts.extend_from_slice(components);
        Self(parts.join(":"))
    }

    /// Key of the per-recipient unread gift counter
    pub fn new_gift_count(prefix: Option<&str>, user_id: UserId) -> Self {
        let id = user_id.to_string();
        Self::make(prefix, &[USER_GIFTS_SCOPE, NEW_COUNT_METRIC, &id])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
