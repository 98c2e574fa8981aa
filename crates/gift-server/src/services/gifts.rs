//! Gift giving service: send, read, clear and remove received gifts

use crate::services::tally::GiftTallyCache;
use gift_core::ports::{GiftNotifier, GiftStore, UserGiftStore};
use gift_core::{
    GiftError, GiftId, GiftNotice, GiftSend, Page, Result, UserGiftDetail, UserGiftId, UserId,
    UserRef,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct GiftService {
    gifts: Arc<dyn GiftStore>,
    user_gifts: Arc<dyn UserGiftStore>,
    tally: Arc<GiftTallyCache>,
    notifier: Arc<dyn GiftNotifier>,
}

impl GiftService {
    pub fn new(
        gifts: Arc<dyn GiftStore>,
        user_gifts: Arc<dyn UserGiftStore>,
        tally: Arc<GiftTallyCache>,
        notifier: Arc<dyn GiftNotifier>,
    ) -> Self {
        Self {
            gifts,
            user_gifts,
            tally,
            notifier,
        }
    }

    /// Record a gift from one user to another.
    ///
    /// The row insert and the `given_count` bump commit together before the
    /// recipient's tally is touched or anyone is notified. On a storage error
    /// nothing else happens.
    pub async fn send_gift(
        &self,
        from: UserRef,
        to: UserRef,
        gift_id: GiftId,
        message: String,
    ) -> Result<UserGiftId> {
        for user in [&from, &to] {
            if !user.id.is_valid() {
                return Err(GiftError::InvalidId(user.id.to_string()));
            }
        }

        info!(
            "Sending gift {} from {} ({}) to {} ({})",
            gift_id, from.name, from.id, to.name, to.id
        );

        let send = GiftSend {
            from,
            to,
            gift_id,
            message,
        };
        let user_gift_id = self.user_gifts.record_gift_send(&send).await?;

        self.tally.increment(send.to.id).await;
        self.notify(user_gift_id, send).await;

        Ok(user_gift_id)
    }

    async fn notify(&self, user_gift_id: UserGiftId, send: GiftSend) {
        let gift_name = match self.gifts.get_gift(send.gift_id).await {
            Ok(Some(gift)) => gift.name,
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Could not load gift {} for notification: {}", send.gift_id, e);
                String::new()
            }
        };

        let notice = GiftNotice {
            user_gift_id,
            gift_id: send.gift_id,
            gift_name,
            from: send.from,
            to: send.to,
            message: send.message,
        };
        if let Err(e) = self.notifier.gift_received(&notice).await {
            warn!("Gift notification {} failed: {}", user_gift_id, e);
        }
    }

    pub async fn get_user_gift(&self, id: UserGiftId) -> Result<UserGiftDetail> {
        self.user_gifts
            .get_user_gift(id)
            .await?
            .ok_or_else(|| GiftError::UserGiftNotFound(id.to_string()))
    }

    /// Lookup by a raw request parameter; anything that is not a positive
    /// integer is reported as not found.
    pub async fn get_user_gift_by_param(&self, raw: &str) -> Result<UserGiftDetail> {
        let id = raw
            .parse::<UserGiftId>()
            .map_err(|_| GiftError::UserGiftNotFound(raw.to_string()))?;
        self.get_user_gift(id).await
    }

    pub async fn mark_gift_read(&self, id: UserGiftId) -> Result<()> {
        let previous = self
            .user_gifts
            .mark_read(id)
            .await?
            .ok_or_else(|| GiftError::UserGiftNotFound(id.to_string()))?;

        if previous.status.is_unread() {
            self.tally.decrement(previous.to_user_id).await;
        }
        Ok(())
    }

    /// Mark everything the user received as read and zero the tally
    pub async fn clear_all_user_gift_status(&self, user_id: UserId) -> Result<u64> {
        let changed = self.user_gifts.mark_all_read(user_id).await?;
        debug!("Marked {} gifts read for {}", changed, user_id);
        self.tally.clear(user_id).await;
        Ok(changed)
    }

    pub async fn does_user_own_gift(&self, user_id: UserId, id: UserGiftId) -> Result<bool> {
        Ok(self
            .user_gifts
            .get_user_gift(id)
            .await?
            .is_some_and(|detail| detail.record.to_user_id == user_id))
    }

    pub async fn remove_user_gift(&self, id: UserGiftId) -> Result<()> {
        info!("Removing user gift: {}", id);

        let removed = self
            .user_gifts
            .delete_user_gift(id)
            .await?
            .ok_or_else(|| GiftError::UserGiftNotFound(id.to_string()))?;

        if removed.status.is_unread() {
            self.tally.decrement(removed.to_user_id).await;
        }
        Ok(())
    }

    pub async fn list_user_gifts(&self, user_id: UserId, page: Page) -> Result<Vec<UserGiftDetail>> {
        self.user_gifts.list_received(user_id, page).await
    }

    pub async fn list_all_gifts(&self, page: Page) -> Result<Vec<UserGiftDetail>> {
        self.user_gifts.list_all(page).await
    }

    /// Total gifts received, read or not
    pub async fn gift_count_for_user(&self, user_id: UserId) -> Result<u64> {
        self.user_gifts.count_received(user_id).await
    }

    pub async fn new_gift_count(&self, user_id: UserId) -> Result<u64> {
        self.tally.get(user_id).await
    }
}
