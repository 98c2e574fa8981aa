//! Gift catalog types

use crate::GiftId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry that users can give to each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub id: GiftId,
    pub name: String,
    pub description: String,
    pub category: i64,
    pub threshold: i64,
    /// Number of times this gift has been sent, kept in step with `user_gift`
    pub given_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of a catalog gift, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: i64,
    #[serde(default)]
    pub threshold: i64,
}

impl GiftFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: 0,
            threshold: 0,
        }
    }

    /// Returns a description of the first invalid field, if any
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("gift name must not be empty".to_string());
        }
        if self.threshold < 0 {
            return Err(format!("threshold must be non-negative, got {}", self.threshold));
        }
        Ok(())
    }
}
