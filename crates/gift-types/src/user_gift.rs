//! Given-gift types

use crate::{GiftId, GiftStatus, UserGiftId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as seen by the gift tables: id plus display name at send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
}

impl UserRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }
}

/// One row of `user_gift`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGiftRecord {
    pub id: UserGiftId,
    pub gift_id: GiftId,
    pub from_user_id: UserId,
    pub from_user_name: String,
    pub to_user_id: UserId,
    pub to_user_name: String,
    pub message: String,
    pub status: GiftStatus,
    pub timestamp: DateTime<Utc>,
}

/// A given gift joined with its catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGiftDetail {
    #[serde(flatten)]
    pub record: UserGiftRecord,
    pub gift_name: String,
    pub gift_description: String,
    pub gift_given_count: i64,
}

/// Send request: who gives which gift to whom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftSend {
    pub from: UserRef,
    pub to: UserRef,
    pub gift_id: GiftId,
    #[serde(default)]
    pub message: String,
}

/// Side-effect payload emitted after a send commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftNotice {
    pub user_gift_id: UserGiftId,
    pub gift_id: GiftId,
    pub gift_name: String,
    pub from: UserRef,
    pub to: UserRef,
    pub message: String,
}
