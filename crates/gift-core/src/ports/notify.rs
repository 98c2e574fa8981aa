//! Notification port for committed sends

use crate::Result;
use async_trait::async_trait;
use gift_types::GiftNotice;

/// Receives a notice after a gift send has been committed. Delivery
/// (e-mail, event stream) is owned by the host.
#[async_trait]
pub trait GiftNotifier: Send + Sync {
    async fn gift_received(&self, notice: &GiftNotice) -> Result<()>;
}

/// Notifier that drops every notice
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

#[async_trait]
impl GiftNotifier for NullNotifier {
    async fn gift_received(&self, _notice: &GiftNotice) -> Result<()> {
        Ok(())
    }
}
