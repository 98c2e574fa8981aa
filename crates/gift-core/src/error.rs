//! Error types for the gift subsystem

use gift_types::{GiftId, InvalidId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GiftError>;

#[derive(Error, Debug)]
pub enum GiftError {
    #[error("Gift not found: {0}")]
    GiftNotFound(GiftId),

    #[error("User gift not found: {0}")]
    UserGiftNotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl GiftError {
    /// True for lookups that found nothing, including unparseable ids
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GiftError::GiftNotFound(_) | GiftError::UserGiftNotFound(_) | GiftError::InvalidId(_)
        )
    }

    /// Short machine-readable kind, used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            GiftError::GiftNotFound(_) | GiftError::UserGiftNotFound(_) | GiftError::InvalidId(_) => {
                "not_found"
            }
            GiftError::Validation(_) => "validation",
            GiftError::Database(_) => "database",
            GiftError::Cache(_) => "cache",
            GiftError::Notification(_) => "notification",
        }
    }
}

impl From<InvalidId> for GiftError {
    fn from(e: InvalidId) -> Self {
        GiftError::InvalidId(e.0)
    }
}
