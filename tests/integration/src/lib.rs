//! Integration tests for the Orangic Rust SDK
//!
//! This crate drives the SDK against a wiremock-backed Orangic server:
//! - Chat completion flows
//! - Streaming with final and narrative channels
//! - Retry and error handling
//! - Models, balance and usage endpoints

pub mod fixtures;
pub mod helpers;
pub mod mock_server;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_server::*;

#[cfg(test)]
mod account_tests;
#[cfg(test)]
mod chat_tests;
#[cfg(test)]
mod resilience_tests;
#[cfg(test)]
mod streaming_tests;
