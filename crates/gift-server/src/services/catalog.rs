//! Gift catalog administration

use gift_core::ports::GiftStore;
use gift_core::{GiftError, GiftFields, GiftId, GiftRecord, Page, Result};
use std::sync::Arc;
use tracing::info;

pub struct GiftCatalog {
    store: Arc<dyn GiftStore>,
}

impl GiftCatalog {
    pub fn new(store: Arc<dyn GiftStore>) -> Self {
        Self { store }
    }

    pub async fn get_gift(&self, id: GiftId) -> Result<GiftRecord> {
        self.store
            .get_gift(id)
            .await?
            .ok_or(GiftError::GiftNotFound(id))
    }

    pub async fn add_gift(&self, fields: GiftFields) -> Result<GiftId> {
        fields.validate().map_err(GiftError::Validation)?;
        let id = self.store.add_gift(&fields).await?;
        info!("Created gift {}: {}", id, fields.name);
        Ok(id)
    }

    pub async fn update_gift(&self, id: GiftId, fields: GiftFields) -> Result<GiftRecord> {
        fields.validate().map_err(GiftError::Validation)?;
        self.store.update_gift(id, &fields).await?;
        info!("Updated gift {}: {}", id, fields.name);
        self.get_gift(id).await
    }

    pub async fn list_gifts(&self, page: Page) -> Result<Vec<GiftRecord>> {
        self.store.list_gifts(page).await
    }
}
