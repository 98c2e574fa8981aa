//! Notification delivery for the standalone server

use async_trait::async_trait;
use gift_core::ports::GiftNotifier;
use gift_core::{GiftNotice, Result};
use tracing::info;

/// Writes a structured log event per received gift. Mail and push delivery
/// belong to the host application.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl GiftNotifier for LogNotifier {
    async fn gift_received(&self, notice: &GiftNotice) -> Result<()> {
        info!(
            user_gift_id = %notice.user_gift_id,
            gift_id = %notice.gift_id,
            to_user = %notice.to.id,
            "{} received \"{}\" from {}",
            notice.to.name,
            notice.gift_name,
            notice.from.name
        );
        Ok(())
    }
}
