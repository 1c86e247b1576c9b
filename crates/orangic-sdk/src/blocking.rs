//! Blocking client for callers without an async runtime.
//!
//! Each [`Client`] owns a single-threaded tokio runtime and drives the async
//! client on it. Do not call these methods from inside an async context;
//! tokio panics when a runtime is blocked on from within another.
//!
//! ```rust,no_run
//! use orangic_sdk::blocking::Client;
//! use orangic_sdk::ChatCompletionRequest;
//!
//! fn main() -> Result<(), orangic_sdk::Error> {
//!     let client = Client::from_env()?;
//!     let request = ChatCompletionRequest::builder()
//!         .model("org-1")
//!         .user_message("Hello!")
//!         .build()?;
//!
//!     for chunk in client.create_stream(&request)? {
//!         print!("{}", chunk?.content());
//!     }
//!     Ok(())
//! }
//! ```

use crate::account::{Balance, UsageReport, DEFAULT_USAGE_DAYS};
use crate::client::ClientBuilder;
use crate::error::{Error, Result};
use crate::models::{ModelInfo, ModelList};
use crate::request::ChatCompletionRequest;
use crate::response::ChatCompletion;
use crate::streaming::{ChatStream, StreamChunk, StreamResult};
use crate::ClientConfig;
use futures::StreamExt;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Blocking counterpart of [`crate::Client`].
#[derive(Debug, Clone)]
pub struct Client {
    inner: crate::Client,
    runtime: Arc<Runtime>,
}

impl Client {
    /// Wrap a configured async builder.
    pub fn from_builder(builder: ClientBuilder) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::configuration(format!("Failed to start runtime: {e}")))?;
        Ok(Self {
            inner: builder.build()?,
            runtime: Arc::new(runtime),
        })
    }

    /// Create a client from `ORANGIC_API_KEY` and default settings.
    pub fn from_env() -> Result<Self> {
        Self::from_builder(crate::Client::builder())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// Send a chat completion request and wait for the whole reply.
    pub fn create(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        self.runtime.block_on(self.inner.completions().create(request))
    }

    /// Send a streaming chat completion request.
    pub fn create_stream(&self, request: &ChatCompletionRequest) -> Result<ChatStreamIter> {
        let stream = self
            .runtime
            .block_on(self.inner.completions().create_stream(request))?;
        Ok(ChatStreamIter {
            stream,
            runtime: Arc::clone(&self.runtime),
        })
    }

    /// List available models.
    pub fn list_models(&self) -> Result<ModelList> {
        self.runtime.block_on(self.inner.models().list())
    }

    /// Retrieve a single model by id.
    pub fn retrieve_model(&self, id: &str) -> Result<ModelInfo> {
        self.runtime.block_on(self.inner.models().retrieve(id))
    }

    /// Get the current balance for this API key.
    pub fn balance(&self) -> Result<Balance> {
        self.runtime.block_on(self.inner.account().balance())
    }

    /// Get the usage report for the last `days` days (1 to 365).
    pub fn usage(&self, days: u32) -> Result<UsageReport> {
        self.runtime.block_on(self.inner.account().usage(days))
    }

    /// Get the usage report for the default 30-day window.
    pub fn usage_default(&self) -> Result<UsageReport> {
        self.usage(DEFAULT_USAGE_DAYS)
    }
}

/// Iterator over the chunks of a streaming reply.
#[derive(Debug)]
pub struct ChatStreamIter {
    stream: ChatStream,
    runtime: Arc<Runtime>,
}

impl ChatStreamIter {
    /// Drain the iterator into a [`StreamResult`].
    pub fn collect_result(self) -> Result<StreamResult> {
        let mut result = StreamResult::new();
        for chunk in self {
            result.add_chunk(&chunk?);
        }
        Ok(result)
    }

    /// Final-channel content received so far.
    pub fn buffer(&self) -> &str {
        self.stream.buffer()
    }
}

impl Iterator for ChatStreamIter {
    type Item = Result<StreamChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime.block_on(self.stream.next())
    }
}
