//! Streaming integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_server::*;
use futures::StreamExt;
use orangic_sdk::{Channel, Error};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_stream_collects_channels() {
    let mock = MockOrangic::new().await;
    mock.mock_streaming_response(&[
        ("Considering the question", true),
        ("Paris", false),
        (" is the capital.", false),
    ])
    .await;

    let client = test_client(&mock.url());
    let result = client
        .chat()
        .model(TEST_MODEL)
        .user_message("Capital of France?")
        .stream()
        .await
        .unwrap()
        .collect_result()
        .await
        .unwrap();

    assert_eq!(result.content, "Paris is the capital.");
    assert_eq!(result.narrative, "Considering the question");
    assert_eq!(result.chunk_count, 3);

    let recorded = mock.chat_requests().await;
    assert_eq!(recorded[0].stream, Some(true));
}

#[tokio::test]
async fn test_stream_chunk_order() {
    let mock = MockOrangic::new().await;
    let words = ["one", "two", "three", "four"];
    let chunks: Vec<(&str, bool)> = words.iter().map(|w| (*w, false)).collect();
    mock.mock_streaming_response(&chunks).await;

    let client = test_client(&mock.url());
    let stream = client
        .completions()
        .create_stream(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap();

    let received: Vec<String> = stream
        .map(|chunk| chunk.unwrap().content)
        .collect()
        .await;
    assert_eq!(received, words);
}

#[tokio::test]
async fn test_stream_without_done_ends_at_body_end() {
    let mock = MockOrangic::new().await;
    mock.mock_raw_stream("data: {\"content\": \"partial\"}\n\ndata: {\"content\": \" reply\"}")
        .await;

    let client = test_client(&mock.url());
    let content = client
        .completions()
        .create_stream(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap()
        .collect_content()
        .await
        .unwrap();
    assert_eq!(content, "partial reply");
}

#[tokio::test]
async fn test_stream_error_event_ends_stream() {
    let mock = MockOrangic::new().await;
    mock.mock_raw_stream(concat!(
        "data: {\"content\": \"Hel\", \"channel\": \"final\"}\n\n",
        "data: {\"error\": \"model overloaded\"}\n\n",
        "data: {\"content\": \"lo\", \"channel\": \"final\"}\n\n",
    ))
    .await;

    let client = test_client(&mock.url());
    let mut stream = client
        .completions()
        .create_stream(&simple_chat_request(TEST_MODEL))
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!((&first.channel, first.content()), (&Channel::Final, "Hel"));

    match stream.next().await {
        Some(Err(Error::Streaming { message })) => assert_eq!(message, "model overloaded"),
        other => panic!("expected streaming error, got {other:?}"),
    }
    assert!(stream.next().await.is_none());
}
