//! Integration tests for per-order marketplace tracking lookups.
//!
//! One lookup per order id, sequential, merged into one result. A missing
//! order is skipped; any other failure aborts the whole call.

use std::time::Duration;

use fulfillment_core::{OrderId, Service, TrackingOptions};
use fulfillment_integration_tests::{fixtures, form_value, mws_config, mws_service};
use fulfillment_providers::TransportError;

fn ids(ids: &[&str]) -> Vec<OrderId> {
    ids.iter().copied().map(OrderId::new).collect()
}

// =============================================================================
// Merging
// =============================================================================

#[tokio::test]
async fn test_lookups_are_merged() {
    let service = mws_service(mws_config());
    service
        .transport()
        .push_body(fixtures::tracking_response("X", "1Z001", "UPS"))
        .push_body(fixtures::tracking_response("Y", "9400", "USPS"));

    let response = service
        .fetch_tracking_data(&ids(&["X", "Y"]), &TrackingOptions::default())
        .await;

    assert!(response.is_success());
    assert_eq!(response.tracking_numbers().get("X"), Some(&vec!["1Z001".to_string()]));
    assert_eq!(response.tracking_numbers().get("Y"), Some(&vec!["9400".to_string()]));
    assert_eq!(response.tracking_companies().get("X"), Some(&vec!["UPS".to_string()]));
    assert_eq!(response.tracking_companies().get("Y"), Some(&vec!["USPS".to_string()]));
    assert!(response.tracking_urls().is_empty());

    let requested: Vec<String> = service
        .transport()
        .bodies()
        .iter()
        .filter_map(|body| form_value(body, "SellerFulfillmentOrderId"))
        .collect();
    assert_eq!(requested, vec!["X", "Y"]);
}

#[tokio::test]
async fn test_empty_id_list_is_empty_success() {
    let service = mws_service(mws_config());

    let response = service
        .fetch_tracking_data(&[], &TrackingOptions::default())
        .await;

    assert!(response.is_success());
    assert!(response.data().is_empty());
    assert_eq!(service.transport().request_count(), 0);
}

// =============================================================================
// Order Not Found
// =============================================================================

#[tokio::test]
async fn test_missing_order_is_skipped() {
    let service = mws_service(mws_config());
    service
        .transport()
        .push_body(fixtures::tracking_response("X", "1Z001", "UPS"))
        .push_status(500, fixtures::order_not_found("Y"))
        .push_body(fixtures::tracking_response("Z", "1Z003", "UPS"));

    let response = service
        .fetch_tracking_data(&ids(&["X", "Y", "Z"]), &TrackingOptions::default())
        .await;

    assert!(response.is_success());
    assert_eq!(response.tracking_numbers().len(), 2);
    assert!(response.tracking_numbers().contains_key("X"));
    assert!(!response.tracking_numbers().contains_key("Y"));
    assert!(response.tracking_numbers().contains_key("Z"));
}

#[tokio::test]
async fn test_missing_order_in_success_body_is_skipped() {
    let service = mws_service(mws_config());
    service.transport().push_body(fixtures::order_not_found("Y"));

    let response = service
        .fetch_tracking_data(&ids(&["Y"]), &TrackingOptions::default())
        .await;

    assert!(response.is_success());
    assert!(response.data().is_empty());
}

// =============================================================================
// Abort On Failure
// =============================================================================

#[tokio::test]
async fn test_other_fault_aborts_lookup() {
    let service = mws_service(mws_config());
    service
        .transport()
        .push_body(fixtures::tracking_response("X", "1Z001", "UPS"))
        .push_status(
            500,
            fixtures::fault("InternalError", "Something has gone terribly wrong!"),
        )
        .push_body(fixtures::tracking_response("Z", "1Z003", "UPS"));

    let response = service
        .fetch_tracking_data(&ids(&["X", "Y", "Z"]), &TrackingOptions::default())
        .await;

    assert!(!response.is_success());
    assert_eq!(
        response.get("faultstring"),
        Some("Something has gone terribly wrong!")
    );
    assert_eq!(
        response.message(),
        Some("InternalError: Something has gone terribly wrong!")
    );
    assert!(response.data().is_empty());
    assert_eq!(service.transport().request_count(), 2);
}

#[tokio::test]
async fn test_connection_failure_aborts_lookup() {
    let service = mws_service(mws_config());
    service
        .transport()
        .push(Err(TransportError::Connection("connection reset".into())));

    let response = service
        .fetch_tracking_data(&ids(&["X", "Y"]), &TrackingOptions::default())
        .await;

    assert!(!response.is_success());
    assert_eq!(response.get("response_comment"), Some("connection reset"));
    assert_eq!(service.transport().request_count(), 1);
}

// =============================================================================
// Throttling
// =============================================================================

fn scripted_ids(count: usize) -> Vec<OrderId> {
    (1..=count).map(|i| OrderId::new(format!("ORDER-{i}"))).collect()
}

#[tokio::test(start_paused = true)]
async fn test_throttle_sleeps_after_every_interval() {
    let service = mws_service(mws_config());
    service
        .transport()
        .repeat(Ok(fixtures::tracking_response("ANY", "1Z", "UPS")));

    let options = TrackingOptions::default().with_throttle(10, Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let response = service.fetch_tracking_data(&scripted_ids(30), &options).await;

    assert!(response.is_success());
    assert_eq!(service.transport().request_count(), 30);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_interval_of_one_sleeps_after_every_lookup() {
    let service = mws_service(mws_config());
    service
        .transport()
        .repeat(Ok(fixtures::tracking_response("ANY", "1Z", "UPS")));

    let options = TrackingOptions::default().with_throttle(1, Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let response = service.fetch_tracking_data(&scripted_ids(3), &options).await;

    assert!(response.is_success());
    assert_eq!(service.transport().request_count(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_throttle_not_reached() {
    let service = mws_service(mws_config());
    service
        .transport()
        .repeat(Ok(fixtures::tracking_response("ANY", "1Z", "UPS")));

    let options = TrackingOptions::default().with_throttle(10, Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let response = service.fetch_tracking_data(&scripted_ids(5), &options).await;

    assert!(response.is_success());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_never_sleeps() {
    let service = mws_service(mws_config());
    service
        .transport()
        .repeat(Ok(fixtures::tracking_response("ANY", "1Z", "UPS")));

    let options = TrackingOptions::default().with_throttle(0, Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let response = service.fetch_tracking_data(&scripted_ids(12), &options).await;

    assert!(response.is_success());
    assert_eq!(started.elapsed(), Duration::ZERO);
}
