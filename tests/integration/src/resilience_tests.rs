//! Retry and error handling integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_server::*;
use orangic_sdk::{Error, TransportKind};
use std::time::Duration;

#[tokio::test]
async fn test_retries_server_errors_until_success() {
    let mock = MockOrangic::new().await;
    mock.mock_flaky_endpoint(TEST_MODEL, 502, 2).await;

    let client = test_client(&mock.url());
    let response = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap();

    assert_eq!(response.content(), "Success after retries");
    assert_eq!(mock.calls().await, 3);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let mock = MockOrangic::new().await;
    mock.mock_flaky_endpoint(TEST_MODEL, 500, 5).await;

    let client = test_client_builder(&mock.url()).max_retries(1).build().unwrap();
    let result = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await;

    assert_status(&result, 500);
    assert_eq!(mock.calls().await, 2);
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let mock = MockOrangic::new().await;
    mock.mock_rate_limit(30).await;

    let client = test_client(&mock.url());
    let err = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimited { .. }));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    // Retry-After is capped by the client's max delay, so three quick attempts
    assert_eq!(mock.calls().await, 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    for (status, expect_auth) in [(400, false), (401, true), (403, true), (404, false), (422, false)] {
        let mock = MockOrangic::new().await;
        mock.mock_error(status, "nope").await;

        let client = test_client(&mock.url());
        let result = client
            .completions()
            .create(&simple_chat_request(TEST_MODEL))
            .await;

        assert_status(&result, status);
        let err = result.unwrap_err();
        assert_eq!(err.is_authentication(), expect_auth, "status {status}");
        assert!(err.to_string().contains("nope"));
        assert_eq!(mock.calls().await, 1, "status {status}");
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion_delayed(TEST_MODEL, "too late", Duration::from_secs(2))
        .await;

    let client = test_client_builder(&mock.url())
        .timeout(Duration::from_millis(100))
        .max_retries(1)
        .build()
        .unwrap();
    let err = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport {
            kind: TransportKind::Timeout,
            ..
        }
    ));
    assert_eq!(mock.calls().await, 2);
}

#[tokio::test]
async fn test_unreachable_server_is_connect_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = test_client_builder(&format!("http://127.0.0.1:{port}"))
        .max_retries(0)
        .build()
        .unwrap();
    let err = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(!err.is_authentication());
}
