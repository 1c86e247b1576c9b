//! Models, balance and usage integration tests

use crate::helpers::*;
use crate::mock_server::*;
use orangic_sdk::Error;
use serde_json::json;

#[tokio::test]
async fn test_list_models() {
    let mock = MockOrangic::new().await;
    mock.mock_models().await;

    let client = test_client(&mock.url());
    let models = client.models().list().await.unwrap();

    assert_eq!(models.object, "list");
    assert_eq!(models.ids().collect::<Vec<_>>(), vec!["org-1", "org-1-mini"]);
    assert_eq!(models.get("org-1").unwrap().owned_by, "orangic");
}

#[tokio::test]
async fn test_retrieve_model() {
    let mock = MockOrangic::new().await;
    mock.mock_models().await;

    let client = test_client(&mock.url());
    let model = client.models().retrieve("org-1-mini").await.unwrap();
    assert_eq!(model.id, "org-1-mini");
    assert_eq!(model.created, 1_700_000_100);
}

#[tokio::test]
async fn test_retrieve_unknown_model_is_404() {
    let mock = MockOrangic::new().await;
    mock.mock_models().await;

    let client = test_client(&mock.url());
    let result = client.models().retrieve("org-9").await;
    assert_status(&result, 404);
}

#[tokio::test]
async fn test_balance() {
    let mock = MockOrangic::new().await;
    mock.mock_balance().await;

    let client = test_client(&mock.url());
    let balance = client.account().balance().await.unwrap();
    assert_eq!(balance.balance, Some(42.5));
    assert_eq!(balance.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn test_usage_default_window() {
    let mock = MockOrangic::new().await;
    mock.mock_usage(30).await;

    let client = test_client(&mock.url());
    let report = client.account().usage_default().await.unwrap();
    assert_eq!(report.days, Some(30));
    assert_eq!(report.extra["total_tokens"], json!(3400));
}

#[tokio::test]
async fn test_usage_bounds() {
    let mock = MockOrangic::new().await;
    mock.mock_usage(1).await;
    mock.mock_usage(365).await;

    let client = test_client(&mock.url());
    assert_eq!(client.account().usage(1).await.unwrap().days, Some(1));
    assert_eq!(client.account().usage(365).await.unwrap().days, Some(365));

    let err = client.account().usage(366).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest { parameter: Some(ref p), .. } if p == "days"));
    assert_eq!(mock.calls().await, 2);
}
