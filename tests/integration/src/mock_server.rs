//! Mock Orangic API server for integration testing
//!
//! Wraps a wiremock server and mounts canned responses for each endpoint.

use crate::fixtures::*;
use crate::helpers::TEST_API_KEY;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/v1/chat/completions";

/// Chat request body as the server received it.
#[derive(Debug, Deserialize)]
pub struct RecordedChat {
    /// Requested model.
    pub model: String,
    /// Messages as sent.
    pub messages: Vec<Value>,
    /// Stream flag, absent for plain calls.
    pub stream: Option<bool>,
    /// Integer reasoning level.
    pub reasoning: Option<u8>,
    /// Every other field.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

/// Mock Orangic API server
pub struct MockOrangic {
    pub server: MockServer,
}

impl MockOrangic {
    /// Create a new mock Orangic server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the number of requests received so far
    pub async fn calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// Chat bodies received so far, in order
    pub async fn chat_requests(&self) -> Vec<RecordedChat> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == CHAT_PATH)
            .map(|r| serde_json::from_slice(&r.body).expect("chat body is JSON"))
            .collect()
    }

    /// Setup a successful chat completion response
    pub async fn mock_chat_completion(&self, model: &str, response_content: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response_json(model, response_content))
                    .append_header("Content-Type", "application/json"),
            )
            .expect(1..)
            .mount(&self.server)
            .await;
    }

    /// Setup a chat completion that returns after a delay
    pub async fn mock_chat_completion_delayed(
        &self,
        model: &str,
        response_content: &str,
        delay: Duration,
    ) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response_json(model, response_content))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup a streaming response
    pub async fn mock_streaming_response(&self, chunks: &[(&str, bool)]) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(sse_body(chunks))
                    .append_header("Content-Type", "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup a raw event-stream body
    pub async fn mock_raw_stream(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body.to_string())
                    .append_header("Content-Type", "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup a rate limit error response
    pub async fn mock_rate_limit(&self, retry_after_secs: u64) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(error_response("rate_limit_exceeded", "Rate limit exceeded"))
                    .append_header("Retry-After", retry_after_secs.to_string().as_str()),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup an error response with the given status
    pub async fn mock_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(serde_json::json!({"error": message})),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup a response that fails N times with `status` then succeeds
    pub async fn mock_flaky_endpoint(&self, model: &str, status: u16, fail_count: u64) {
        // Failures are mounted first and stop matching once used up
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(fail_count)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response_json(model, "Success after retries")),
            )
            .mount(&self.server)
            .await;
    }

    /// Setup the models endpoints
    pub async fn mock_models(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models_list_response()))
            .mount(&self.server)
            .await;

        let list = models_list_response();
        for model in list["data"].as_array().into_iter().flatten() {
            let id = model["id"].as_str().unwrap_or_default();
            Mock::given(method("GET"))
                .and(path(format!("/v1/models/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(model.clone()))
                .mount(&self.server)
                .await;
        }
    }

    /// Setup the balance endpoint
    pub async fn mock_balance(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(balance_response()))
            .mount(&self.server)
            .await;
    }

    /// Setup the usage endpoint for one `days` value
    pub async fn mock_usage(&self, days: u32) {
        Mock::given(method("GET"))
            .and(path("/v1/report/usage"))
            .and(query_param("days", days.to_string().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(usage_response(days)))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}
