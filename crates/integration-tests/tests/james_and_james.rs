//! Integration tests for the James & James JSON warehouse.

use fulfillment_core::{OrderId, RequestError, Service, StockLevelQuery, TrackingOptions};
use fulfillment_integration_tests::{capture_logs, fixtures, order};
use fulfillment_providers::james_and_james::TRACKING_UNSUPPORTED;
use fulfillment_providers::testing::ScriptedTransport;
use fulfillment_providers::{ConfigError, JamesAndJamesService, ServiceConfig};
use serde_json::Value;

const SUBDOMAIN: &str = "acme";
const API_KEY: &str = "2bd6c4f1e09a";

fn service(test_mode: bool) -> JamesAndJamesService<ScriptedTransport> {
    let config = ServiceConfig::new(SUBDOMAIN, API_KEY).with_test_mode(test_mode);
    JamesAndJamesService::with_transport(config, ScriptedTransport::new()).expect("valid subdomain")
}

// =============================================================================
// Fulfillment
// =============================================================================

#[tokio::test]
async fn test_successful_fulfillment() {
    let service = service(true);
    service.transport().push_body(fixtures::james_and_james::SUCCESS);

    let response = service.fulfill(&order()).await.expect("valid order");

    assert!(response.is_success());
    assert!(response.is_test());
    assert_eq!(response.params().get("valid"), Some(&Value::Bool(true)));

    let request = service.transport().requests().pop().expect("one request");
    assert_eq!(request.url, "https://acme.sixworks.co.uk/api/1/");
    assert_eq!(request.header_value("Content-Type"), Some("application/json"));

    let body: Value = serde_json::from_str(request.body.as_deref().expect("json body"))
        .expect("body is json");
    assert_eq!(body["api_key"], API_KEY);
    assert_eq!(body["test"], true);
    assert_eq!(body["order"]["client_ref"], "12345678");
    assert_eq!(body["order"]["ShippingContact"]["postcode"], "90210");
    assert_eq!(body["order"]["BillingContact"]["name"], "Johnny Chase");
    assert_eq!(body["order"]["items"][1]["client_ref"], "FOOBAR1");
    assert_eq!(body["order"]["items"][1]["quantity"], 2);
}

#[tokio::test]
async fn test_failed_fulfillment() {
    let service = service(true);
    service.transport().push_body(fixtures::james_and_james::FAILURE);

    let response = service.fulfill(&order()).await.expect("valid order");

    assert!(!response.is_success());
    assert!(response.is_test());
}

#[tokio::test]
async fn test_garbage_reply_is_failure() {
    let service = service(false);
    service
        .transport()
        .push_body(r#"<font face="Arial" size=2>/XML/shippingTest.asp</font>"#);

    let response = service.fulfill(&order()).await.expect("valid order");

    assert!(!response.is_success());
    assert!(response.message().is_some_and(|m| m.starts_with("Malformed response")));
    assert!(response.get("http_body").is_some());
}

#[tokio::test]
async fn test_billing_address_is_required() {
    let service = service(true);
    let mut order = order();
    order.billing_address = None;

    assert_eq!(
        service.fulfill(&order).await.expect_err("caller error"),
        RequestError::MissingField("billing_address")
    );
    assert_eq!(service.transport().request_count(), 0);
}

// =============================================================================
// Stock And Tracking
// =============================================================================

#[tokio::test]
async fn test_stock_levels() {
    let service = service(true);
    service.transport().push_body(fixtures::james_and_james::INVENTORY);

    let response = service.fetch_stock_levels(&StockLevelQuery::all()).await;

    assert!(response.is_success());
    assert_eq!(response.stock_levels().get("AAA"), Some(&99));
    assert_eq!(response.stock_levels().get("BBB"), Some(&9));

    let request = service.transport().requests().pop().expect("one request");
    assert_eq!(
        request.url,
        format!("https://acme.sixworks.co.uk/api/1/stock?api_key={API_KEY}&test=true")
    );
}

#[tokio::test]
async fn test_stock_levels_filtered_to_requested_skus() {
    let service = service(true);
    service.transport().push_body(fixtures::james_and_james::INVENTORY);

    let response = service
        .fetch_stock_levels(&StockLevelQuery::for_skus(["BBB"]))
        .await;

    assert_eq!(response.stock_levels().len(), 1);
    assert_eq!(response.stock_levels().get("BBB"), Some(&9));
}

#[tokio::test]
async fn test_tracking_is_unsupported() {
    let service = service(false);

    let response = service
        .fetch_tracking_data(&[OrderId::new("12345678")], &TrackingOptions::default())
        .await;

    assert!(!response.is_success());
    assert_eq!(response.message(), Some(TRACKING_UNSUPPORTED));
    assert_eq!(service.transport().request_count(), 0);
}

#[tokio::test]
async fn test_valid_credentials() {
    let service = service(true);
    service
        .transport()
        .push_body(fixtures::james_and_james::INVENTORY)
        .push_status(401, r#"{"success": false, "message": "Invalid API key"}"#);

    assert!(service.valid_credentials().await);
    assert!(!service.valid_credentials().await);
}

// =============================================================================
// Configuration And Logging
// =============================================================================

#[test]
fn test_invalid_subdomain_is_rejected() {
    let config = ServiceConfig::new("evil.example.com/", API_KEY);
    let err = JamesAndJamesService::with_transport(config, ScriptedTransport::new())
        .expect_err("not a subdomain");

    assert!(matches!(err, ConfigError::InvalidLogin(_)));
}

#[tokio::test]
async fn test_api_key_is_not_logged() {
    let (logs, _guard) = capture_logs();
    let service = service(true);
    service
        .transport()
        .push_body(fixtures::james_and_james::SUCCESS)
        .push_body(fixtures::james_and_james::INVENTORY);

    service.fulfill(&order()).await.expect("valid order");
    service.fetch_stock_levels(&StockLevelQuery::all()).await;

    let output = logs.contents();
    assert!(output.contains("James & James request"), "{output}");
    assert!(output.contains("[filtered]"), "{output}");
    assert!(!output.contains(API_KEY), "{output}");
}

#[tokio::test]
async fn test_json_escaped_api_key_is_not_logged() {
    const QUOTED_KEY: &str = r#"ab"cd\ef"#;

    let (logs, _guard) = capture_logs();
    let config = ServiceConfig::new(SUBDOMAIN, QUOTED_KEY).with_test_mode(true);
    let service = JamesAndJamesService::with_transport(config, ScriptedTransport::new())
        .expect("valid subdomain");
    service.transport().push_body(fixtures::james_and_james::SUCCESS);

    service.fulfill(&order()).await.expect("valid order");

    let body = service.transport().bodies().pop().expect("one request");
    assert!(body.contains(r#""ab\"cd\\ef""#), "{body}");

    let output = logs.contents();
    assert!(output.contains("James & James request"), "{output}");
    assert!(!output.contains(r#"ab\"cd\\ef"#), "{output}");
    assert!(!output.contains(QUOTED_KEY), "{output}");
}
