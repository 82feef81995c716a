//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory test app with seeded users and friendships
//! - Session token helpers
//! - Custom assertion macros

pub mod app;
pub mod assertions;

// Re-export commonly used utilities
pub use app::*;
