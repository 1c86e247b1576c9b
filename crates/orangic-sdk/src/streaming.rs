//! Streaming support for the Orangic SDK.
//!
//! The server answers a streaming request with server-sent events, one JSON
//! object per `data:` line, and closes the sequence with `data: [DONE]`.

use crate::error::{Error, Result};
use crate::response::null_as_default;
use bytes::Bytes;
use futures::stream::Stream;
use pin_project_lite::pin_project;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// Terminal marker sent as the last event of a stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Which part of the reply a chunk belongs to.
///
/// Channel names the SDK does not know are kept as [`Channel::Other`] so no
/// text is lost when the server adds one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    /// Final answer text.
    #[default]
    Final,
    /// "Thinking" commentary emitted while the model reasons.
    Narrative,
    /// Any other channel, by name.
    Other(String),
}

impl Channel {
    /// Wire name of the channel.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Final => "final",
            Self::Narrative => "narrative",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        match name.as_str() {
            "final" => Self::Final,
            "narrative" => Self::Narrative,
            _ => Self::Other(name),
        }
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chunk from a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Text fragment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Channel the fragment belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel: Channel,
}

impl StreamChunk {
    /// Create a chunk.
    pub fn new(channel: Channel, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            channel,
        }
    }

    /// Get the text fragment.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if this chunk is part of the final answer.
    pub fn is_final(&self) -> bool {
        self.channel == Channel::Final
    }

    /// Check if this chunk is thinking commentary.
    pub fn is_narrative(&self) -> bool {
        self.channel == Channel::Narrative
    }

    /// Check if this chunk contains content.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

pin_project! {
    /// A stream of chat completion chunks.
    ///
    /// Finite and not restartable. Dropping it closes the connection.
    pub struct ChatStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>,
        buffer: String,
        done: bool,
    }
}

impl ChatStream {
    /// Create a new chat stream from a byte stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(parse_sse_stream(stream)),
            buffer: String::new(),
            done: false,
        }
    }

    /// Collect the final-channel content from the stream.
    pub async fn collect_content(self) -> Result<String> {
        self.collect_result().await.map(|result| result.content)
    }

    /// Drain the stream into a [`StreamResult`].
    pub async fn collect_result(mut self) -> Result<StreamResult> {
        use futures::StreamExt;

        let mut result = StreamResult::new();
        while let Some(chunk) = self.next().await {
            result.add_chunk(&chunk?);
        }
        Ok(result)
    }

    /// Final-channel content received so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Check if the stream is done.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("buffered", &self.buffer.len())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Stream for ChatStream {
    type Item = Result<StreamChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if chunk.is_final() {
                    this.buffer.push_str(chunk.content());
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                *this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Outcome of interpreting one line of the event stream.
#[derive(Debug, PartialEq)]
enum SseLine {
    Chunk(StreamChunk),
    Failed(String),
    Done,
    Skip,
}

/// Interpret one line of the event stream.
fn parse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data:") else {
        // comments, `event:`/`id:`/`retry:` fields and blank separators
        return SseLine::Skip;
    };
    let data = data.strip_prefix(' ').unwrap_or(data);
    let trimmed = data.trim();

    if trimmed == DONE_MARKER {
        return SseLine::Done;
    }
    if trimmed.is_empty() {
        return SseLine::Skip;
    }

    let value: serde_json::Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            debug!("Failed to parse chunk: {} - data: {}", e, trimmed);
            return SseLine::Skip;
        }
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = error
            .as_str()
            .or_else(|| error.get("message").and_then(serde_json::Value::as_str))
            .map_or_else(|| error.to_string(), String::from);
        return SseLine::Failed(message);
    }

    match serde_json::from_value::<StreamChunk>(value) {
        Ok(chunk) => SseLine::Chunk(chunk),
        Err(e) => {
            debug!("Skipping chunk with unexpected shape: {} - data: {}", e, trimmed);
            SseLine::Skip
        }
    }
}

/// Splits a byte stream into lines, holding partial lines between reads.
#[derive(Debug, Default)]
struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    /// Feed bytes and return every line they complete.
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&raw));
        }
        lines
    }

    /// Return the unterminated tail, if any.
    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(decode_line(&raw))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Parse an SSE byte stream into chunks.
fn parse_sse_stream<S>(stream: S) -> impl Stream<Item = Result<StreamChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send,
{
    async_stream::stream! {
        use futures::StreamExt;

        let mut stream = std::pin::pin!(stream);
        let mut decoder = LineDecoder::default();

        while let Some(result) = stream.next().await {
            let bytes = match result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(Error::from_reqwest(&e));
                    return;
                }
            };

            for line in decoder.push(&bytes) {
                match parse_line(&line) {
                    SseLine::Chunk(chunk) => yield Ok(chunk),
                    SseLine::Failed(message) => {
                        yield Err(Error::streaming(message));
                        return;
                    }
                    SseLine::Done => return,
                    SseLine::Skip => {}
                }
            }
        }

        // Body ended without a trailing newline.
        if let Some(line) = decoder.finish() {
            match parse_line(&line) {
                SseLine::Chunk(chunk) => yield Ok(chunk),
                SseLine::Failed(message) => yield Err(Error::streaming(message)),
                SseLine::Done | SseLine::Skip => {}
            }
        }
    }
}

/// Collected result from a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamResult {
    /// Accumulated final-channel content.
    pub content: String,
    /// Accumulated content from every non-final channel.
    pub narrative: String,
    /// Number of chunks received.
    pub chunk_count: usize,
}

impl StreamResult {
    /// Create an empty stream result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk to the result.
    pub fn add_chunk(&mut self, chunk: &StreamChunk) {
        if chunk.is_final() {
            self.content.push_str(chunk.content());
        } else {
            self.narrative.push_str(chunk.content());
        }
        self.chunk_count += 1;
    }
}
