//! Chat completions resource.

use crate::client::Client;
use crate::error::Result;
use crate::request::{ChatCompletionRequest, ChatCompletionRequestBuilder, Message, ReasoningLevel};
use crate::response::ChatCompletion;
use crate::streaming::ChatStream;
use tracing::{debug, instrument};

const CHAT_COMPLETIONS_PATH: [&str; 3] = ["v1", "chat", "completions"];

/// The `/v1/chat/completions` endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Completions<'a> {
    client: &'a Client,
}

impl<'a> Completions<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Send a chat completion request and wait for the whole reply.
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub async fn create(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        request.validate()?;

        let mut request = request.clone();
        request.stream = None;

        debug!("Sending chat completion request");
        let url = self.client.endpoint(&CHAT_COMPLETIONS_PATH)?;
        self.client.post_json(url, &request).await
    }

    /// Send a streaming chat completion request.
    ///
    /// Only opening the connection is retried; once the stream is handed
    /// back, failures surface as stream items.
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub async fn create_stream(&self, request: &ChatCompletionRequest) -> Result<ChatStream> {
        request.validate()?;

        let mut request = request.clone();
        request.stream = Some(true);

        debug!("Sending streaming chat completion request");
        let url = self.client.endpoint(&CHAT_COMPLETIONS_PATH)?;
        let response = self.client.post(url, &request).await?;

        Ok(ChatStream::new(response.bytes_stream()))
    }
}

/// Fluent builder that sends a chat completion through a [`Client`].
#[derive(Debug)]
pub struct ChatBuilder {
    client: Client,
    builder: ChatCompletionRequestBuilder,
}

impl ChatBuilder {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            builder: ChatCompletionRequestBuilder::new(),
        }
    }

    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.builder = self.builder.model(model);
        self
    }

    /// Add a message.
    pub fn message(mut self, message: Message) -> Self {
        self.builder = self.builder.message(message);
        self
    }

    /// Add several messages.
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.builder = self.builder.messages(messages);
        self
    }

    /// Set the system message.
    pub fn system_message(mut self, content: impl Into<String>) -> Self {
        self.builder = self.builder.system_message(content);
        self
    }

    /// Add a user message.
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.builder = self.builder.user_message(content);
        self
    }

    /// Add an assistant message.
    pub fn assistant_message(mut self, content: impl Into<String>) -> Self {
        self.builder = self.builder.assistant_message(content);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.builder = self.builder.temperature(temperature);
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.builder = self.builder.max_tokens(max_tokens);
        self
    }

    /// Set top_p.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.builder = self.builder.top_p(top_p);
        self
    }

    /// Set the frequency penalty.
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.builder = self.builder.frequency_penalty(penalty);
        self
    }

    /// Set the presence penalty.
    pub fn presence_penalty(mut self, penalty: f32) -> Self {
        self.builder = self.builder.presence_penalty(penalty);
        self
    }

    /// Add a stop sequence.
    pub fn stop(mut self, sequence: impl Into<String>) -> Self {
        self.builder = self.builder.add_stop(sequence);
        self
    }

    /// Set the reasoning level.
    pub fn reasoning(mut self, level: ReasoningLevel) -> Self {
        self.builder = self.builder.reasoning(level);
        self
    }

    /// Add a provider-specific top-level field.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.builder = self.builder.extra(key, value);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> Result<ChatCompletionRequest> {
        self.builder
            .default_model(self.client.config().default_model())
            .build()
    }

    /// Send the request.
    pub async fn send(self) -> Result<ChatCompletion> {
        let client = self.client.clone();
        let request = self.build()?;
        client.completions().create(&request).await
    }

    /// Send as a streaming request.
    pub async fn stream(mut self) -> Result<ChatStream> {
        self.builder = self.builder.streaming(true);
        let client = self.client.clone();
        let request = self.build()?;
        client.completions().create_stream(&request).await
    }
}
