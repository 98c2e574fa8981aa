//! Port traits (interfaces) for dependency injection

pub mod cache;
pub mod notify;
pub mod storage;

pub use cache::CounterCache;
pub use notify::{GiftNotifier, NullNotifier};
pub use storage::{GiftStore, UserGiftStore};
