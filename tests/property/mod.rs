//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify properties

mod conversation_proptest;
mod event_proptest;
mod pagination_proptest;
