//! API integration tests
//!
//! Integration tests for all API endpoints

mod chat_test;
mod conversation_test;
mod server_test;
