//! Integration tests
//!
//! Drive the full router over in-memory stores.

pub mod api;
