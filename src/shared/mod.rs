//! Shared Module
//!
//! This module contains types that are shared between the services, the HTTP
//! layer and clients: the chat data model, realtime frames, the domain error
//! taxonomy and configuration. Everything here is plain data that serializes
//! to the JSON wire format.

/// Real-time event frames
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Conversation, message, presence and directory types
pub mod messaging;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{ClientFrame, EventType, RealtimeEvent};
