//! Response types for the Orangic SDK.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize an explicit JSON `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn default_object() -> String {
    "chat.completion".to_string()
}

/// Response from a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Unique identifier for this completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Object type (always "chat.completion").
    #[serde(default = "default_object")]
    pub object: String,
    /// Unix timestamp of when the completion was created.
    #[serde(default)]
    pub created: Option<i64>,
    /// Model used for the completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    /// Reply text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Why generation stopped ("stop", "length", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Tool calls requested by the model, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<serde_json::Value>>,
    /// Token usage statistics.
    #[serde(default)]
    pub usage: Usage,
}

impl ChatCompletion {
    /// Reply text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the finish reason.
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    /// Check if the response was completed normally.
    pub fn is_complete(&self) -> bool {
        self.finish_reason() == Some("stop")
    }

    /// Check if the response was truncated due to length.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason() == Some("length")
    }

    /// Get the total number of tokens used.
    pub fn total_tokens(&self) -> u32 {
        self.usage.total_tokens
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Number of tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total number of tokens.
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create new usage statistics.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Check if any tokens were used.
    pub fn has_usage(&self) -> bool {
        self.total_tokens > 0
    }
}

impl std::ops::Add for Usage {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
