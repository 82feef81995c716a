//! Presence Module
//!
//! Online/offline state per user and its fan-out to accepted friends.

pub mod service;
pub mod store;

pub use service::PresenceService;
pub use store::{MemoryPresenceStore, PgPresenceStore, PresenceStore};
