//! Storage traits for the gift tables

use crate::Result;
use async_trait::async_trait;
use gift_types::{
    GiftFields, GiftId, GiftRecord, GiftSend, Page, UserGiftDetail, UserGiftId,
    UserGiftRecord, UserId,
};

/// Gift catalog store (`gift` table)
#[async_trait]
pub trait GiftStore: Send + Sync {
    async fn get_gift(&self, id: GiftId) -> Result<Option<GiftRecord>>;
    async fn add_gift(&self, fields: &GiftFields) -> Result<GiftId>;
    /// Fails with `GiftNotFound` when no row matches
    async fn update_gift(&self, id: GiftId, fields: &GiftFields) -> Result<()>;
    async fn list_gifts(&self, page: Page) -> Result<Vec<GiftRecord>>;
}

/// Given-gift store (`user_gift` table)
#[async_trait]
pub trait UserGiftStore: Send + Sync {
    /// Insert an unread `user_gift` row and bump the gift's `given_count`
    /// in one transaction. Nothing is written if either step fails.
    async fn record_gift_send(&self, send: &GiftSend) -> Result<UserGiftId>;

    async fn get_user_gift(&self, id: UserGiftId) -> Result<Option<UserGiftDetail>>;

    /// `COUNT(*)` of unread gifts addressed to the user
    async fn count_unread(&self, to_user: UserId) -> Result<u64>;

    /// `COUNT(*)` of all gifts addressed to the user
    async fn count_received(&self, to_user: UserId) -> Result<u64>;

    /// Mark one gift read. Returns the row as it was before the update,
    /// `None` if it does not exist.
    async fn mark_read(&self, id: UserGiftId) -> Result<Option<UserGiftRecord>>;

    /// Mark every gift to the user read. Returns the number of rows that
    /// were unread.
    async fn mark_all_read(&self, to_user: UserId) -> Result<u64>;

    /// Delete a gift, returning the removed row
    async fn delete_user_gift(&self, id: UserGiftId) -> Result<Option<UserGiftRecord>>;

    async fn list_received(&self, to_user: UserId, page: Page) -> Result<Vec<UserGiftDetail>>;

    async fn list_all(&self, page: Page) -> Result<Vec<UserGiftDetail>>;
}
