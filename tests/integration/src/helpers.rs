//! Test helper utilities for integration tests

use once_cell::sync::Lazy;
use orangic_sdk::{Client, ClientBuilder};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// API key the mock server expects.
pub const TEST_API_KEY: &str = "sk-integration-test";

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Client builder pointed at `base_url` with fast retries.
pub fn test_client_builder(base_url: &str) -> ClientBuilder {
    Client::builder()
        .base_url(base_url)
        .api_key(TEST_API_KEY)
        .retry_initial_delay(Duration::from_millis(1))
        .retry_max_delay(Duration::from_millis(10))
        .timeout(Duration::from_secs(5))
}

/// Client pointed at `base_url` with default retry count.
pub fn test_client(base_url: &str) -> Client {
    init_tracing();
    test_client_builder(base_url)
        .build()
        .expect("Failed to build test client")
}

/// Assert that an SDK result failed with the given HTTP status.
pub fn assert_status<T: std::fmt::Debug>(result: &orangic_sdk::Result<T>, status: u16) {
    match result {
        Err(e) => assert_eq!(
            e.status_code(),
            Some(status),
            "expected status {status}, got error: {e}"
        ),
        Ok(value) => panic!("expected status {status}, got success: {value:?}"),
    }
}
