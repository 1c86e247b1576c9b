//! Chat completion integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_server::*;
use orangic_sdk::ReasoningLevel;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_simple_chat_completion() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion(TEST_MODEL, "I'm doing well, thanks!").await;

    let client = test_client(&mock.url());
    let response = client
        .completions()
        .create(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap();

    assert_eq!(response.content(), "I'm doing well, thanks!");
    assert_eq!(response.model, TEST_MODEL);
    assert_eq!(response.total_tokens(), 30);
    assert!(response.is_complete());
}

#[tokio::test]
async fn test_message_order_preserved() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion(TEST_MODEL, "12").await;

    let client = test_client(&mock.url());
    client
        .completions()
        .create(&multi_turn_chat_request(TEST_MODEL))
        .await
        .unwrap();

    let recorded = mock.chat_requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].messages,
        vec![
            json!({"role": "user", "content": "What is 2 + 2?"}),
            json!({"role": "assistant", "content": "2 + 2 equals 4."}),
            json!({"role": "user", "content": "And if you multiply that by 3?"}),
        ]
    );
    assert_eq!(recorded[0].stream, None);
}

#[tokio::test]
async fn test_sampling_parameters_sent() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion(TEST_MODEL, "Autumn leaves").await;

    let client = test_client(&mock.url());
    client
        .completions()
        .create(&parameterized_chat_request(TEST_MODEL, ReasoningLevel::High))
        .await
        .unwrap();

    let recorded = mock.chat_requests().await;
    let body = &recorded[0];
    assert_eq!(body.model, TEST_MODEL);
    assert_eq!(body.reasoning, Some(4));
    assert_eq!(body.rest["max_tokens"], json!(64));
    assert_eq!(body.rest["stop"], json!(["\n\n"]));
    assert_eq!(body.rest["seed"], json!(42));
    assert!((body.rest["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_system_message_goes_first() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion(TEST_MODEL, "ok").await;

    let client = test_client(&mock.url());
    client
        .chat()
        .model(TEST_MODEL)
        .user_message("Hi")
        .system_message("You are terse.")
        .send()
        .await
        .unwrap();

    let recorded = mock.chat_requests().await;
    assert_eq!(recorded[0].messages[0]["role"], "system");
    assert_eq!(recorded[0].messages[1]["role"], "user");
}

#[tokio::test]
async fn test_default_model_applied() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion("org-1-mini", "ok").await;

    let client = test_client_builder(&mock.url())
        .default_model("org-1-mini")
        .build()
        .unwrap();
    client.chat().user_message("Hi").send().await.unwrap();

    assert_eq!(mock.chat_requests().await[0].model, "org-1-mini");
}

#[tokio::test]
async fn test_concurrent_requests_share_client() {
    let mock = MockOrangic::new().await;
    mock.mock_chat_completion(TEST_MODEL, "pong").await;

    let client = test_client(&mock.url());
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .chat()
                    .model(TEST_MODEL)
                    .user_message(format!("ping {i}"))
                    .send()
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().unwrap().content(), "pong");
    }
    assert_eq!(mock.calls().await, 5);
}
