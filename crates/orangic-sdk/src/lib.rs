//! # Orangic SDK
//!
//! A Rust SDK for the Orangic chat-completion API.
//!
//! ## Features
//!
//! - Async-first design with full `tokio` support
//! - Streaming responses with Server-Sent Events, split into final and
//!   narrative ("thinking") channels
//! - Automatic retries with exponential backoff for transient failures
//! - Models, balance and usage endpoints
//! - Optional blocking client behind the `blocking` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orangic_sdk::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), orangic_sdk::Error> {
//!     // reads ORANGIC_API_KEY
//!     let client = Client::from_env()?;
//!
//!     let response = client
//!         .chat()
//!         .model("org-1")
//!         .user_message("Hello, world!")
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.content());
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use orangic_sdk::{Client, ReasoningLevel};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), orangic_sdk::Error> {
//!     let client = Client::builder().api_key("your-api-key").build()?;
//!
//!     let mut stream = client
//!         .chat()
//!         .model("org-1")
//!         .reasoning(ReasoningLevel::Medium)
//!         .user_message("Tell me a story")
//!         .stream()
//!         .await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         match chunk {
//!             Ok(chunk) if chunk.is_final() => print!("{}", chunk.content()),
//!             Ok(_) => {}
//!             Err(e) => eprintln!("Error: {}", e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod account;
mod client;
mod completions;
mod config;
mod error;
mod models;
mod request;
mod response;
mod streaming;

#[cfg(feature = "blocking")]
pub mod blocking;

pub use account::{Account, Balance, UsageReport, DEFAULT_USAGE_DAYS, USAGE_DAYS_RANGE};
pub use client::{Client, ClientBuilder};
pub use completions::{ChatBuilder, Completions};
pub use config::ClientConfig;
pub use error::{Error, Result, TransportKind};
pub use models::{ModelInfo, ModelList, Models};
pub use request::{
    ChatCompletionRequest, ChatCompletionRequestBuilder, Message, MessageRole, ReasoningLevel,
};
pub use response::{ChatCompletion, Usage};
pub use streaming::{Channel, ChatStream, StreamChunk, StreamResult, DONE_MARKER};

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Send one chat completion with a client built from the environment.
///
/// Shorthand for `Client::from_env()?.completions().create(&request)`.
/// Build a [`Client`] directly when sending more than one request so the
/// connection pool is reused.
pub async fn completion(request: &ChatCompletionRequest) -> Result<ChatCompletion> {
    Client::from_env()?.completions().create(request).await
}
