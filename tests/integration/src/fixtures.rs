//! Test fixtures and sample data for integration tests

use orangic_sdk::{ChatCompletionRequest, Message, ReasoningLevel};
use serde_json::{json, Value};

/// Default model used across tests.
pub const TEST_MODEL: &str = "org-1";

/// Create a simple chat request for testing
pub fn simple_chat_request(model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::builder()
        .model(model)
        .user_message("Hello, how are you?")
        .build()
        .expect("Failed to build request")
}

/// Create a chat request with system message
pub fn chat_request_with_system(model: &str, system: &str, user: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::builder()
        .model(model)
        .system_message(system)
        .user_message(user)
        .build()
        .expect("Failed to build request")
}

/// Create a multi-turn conversation request
pub fn multi_turn_chat_request(model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        model,
        vec![
            Message::user("What is 2 + 2?"),
            Message::assistant("2 + 2 equals 4."),
            Message::user("And if you multiply that by 3?"),
        ],
    )
}

/// Create a request with every sampling parameter set
pub fn parameterized_chat_request(model: &str, reasoning: ReasoningLevel) -> ChatCompletionRequest {
    ChatCompletionRequest::builder()
        .model(model)
        .user_message("Write a haiku")
        .temperature(0.7)
        .max_tokens(64)
        .top_p(0.9)
        .frequency_penalty(0.5)
        .presence_penalty(-0.5)
        .stop(["\n\n"])
        .reasoning(reasoning)
        .extra("seed", json!(42))
        .build()
        .expect("Failed to build request")
}

/// Chat completion response body
pub fn chat_response_json(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-test123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "content": content,
        "finish_reason": "stop",
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 20,
            "total_tokens": 30
        }
    })
}

/// One streaming event payload
pub fn stream_chunk_json(content: &str, narrative: bool) -> Value {
    json!({
        "content": content,
        "channel": if narrative { "narrative" } else { "final" }
    })
}

/// Server-sent event body for the given chunks, closed with `[DONE]`
pub fn sse_body(chunks: &[(&str, bool)]) -> String {
    let mut body = String::new();
    for (content, narrative) in chunks {
        body.push_str(&format!("data: {}\n\n", stream_chunk_json(content, *narrative)));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Models list response
pub fn models_list_response() -> Value {
    json!({
        "object": "list",
        "data": [
            {"id": "org-1", "object": "model", "created": 1_700_000_000, "owned_by": "orangic"},
            {"id": "org-1-mini", "object": "model", "created": 1_700_000_100, "owned_by": "orangic"}
        ]
    })
}

/// Balance response
pub fn balance_response() -> Value {
    json!({"balance": 42.5, "currency": "USD"})
}

/// Usage report response
pub fn usage_response(days: u32) -> Value {
    json!({
        "days": days,
        "total_requests": 12,
        "total_tokens": 3400,
        "by_model": {"org-1": {"requests": 12, "tokens": 3400}}
    })
}

/// Structured error body
pub fn error_response(error_type: &str, message: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_chat_request() {
        let request = simple_chat_request(TEST_MODEL);
        assert_eq!(request.model, TEST_MODEL);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_chat_request_with_system() {
        let request = chat_request_with_system(TEST_MODEL, "Be terse.", "Hi");
        assert_eq!(request.messages[0].content(), "Be terse.");
        assert_eq!(request.messages[1].content(), "Hi");
    }

    #[test]
    fn test_sse_body_ends_with_done() {
        let body = sse_body(&[("a", false)]);
        assert!(body.starts_with("data: {"));
        assert!(body.ends_with("data: [DONE]\n\n"));
    }
}
