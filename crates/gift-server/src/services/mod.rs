//! Business logic services

pub mod catalog;
pub mod gifts;
pub mod notify;
pub mod tally;

pub use catalog::GiftCatalog;
pub use gifts::GiftService;
pub use notify::LogNotifier;
pub use tally::GiftTallyCache;
