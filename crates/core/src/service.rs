//! The capability set every fulfillment provider adapter implements.

use std::future::Future;

use crate::error::RequestError;
use crate::types::{
    FulfillmentOrderRequest, OrderId, Response, StockLevelQuery, StockLevels, TrackingData,
    TrackingOptions,
};

/// A fulfillment provider.
///
/// Only `fulfill` can return `Err`, and only for caller errors detected
/// before anything is sent. Every remote failure comes back as a
/// [`Response`] with `is_success() == false`.
pub trait Service: Send + Sync {
    /// Submit an order for shipment.
    ///
    /// # Errors
    ///
    /// Returns `RequestError` when a required order or address field is missing.
    fn fulfill(
        &self,
        order: &FulfillmentOrderRequest,
    ) -> impl Future<Output = Result<Response, RequestError>> + Send;

    /// Fetch quantities on hand, following continuation pages to the end.
    fn fetch_stock_levels(
        &self,
        query: &StockLevelQuery,
    ) -> impl Future<Output = Response<StockLevels>> + Send;

    /// Fetch tracking details for each order, one lookup at a time.
    fn fetch_tracking_data(
        &self,
        order_ids: &[OrderId],
        options: &TrackingOptions,
    ) -> impl Future<Output = Response<TrackingData>> + Send;

    /// Whether the configured credentials are accepted by the provider.
    fn valid_credentials(&self) -> impl Future<Output = bool> + Send;

    /// Whether requests go to the provider's test environment.
    fn test_mode(&self) -> bool;

    /// Whether the provider has a test environment at all.
    fn supports_test_mode(&self) -> bool {
        false
    }
}
