//! Webgistix warehouse (plain XML over HTTPS).
//!
//! Each operation posts one XML document to its own `.asp` endpoint with
//! the customer id and password embedded in the body. Order creation has a
//! separate test endpoint, so this adapter supports test mode.
//!
//! Tracking is a single request for all orders; stock levels always cover
//! the whole account and are filtered locally when specific SKUs are asked for.

pub mod parse;
pub mod request;

use fulfillment_core::{
    Address, FulfillmentOrderRequest, OrderId, RequestError, Response, Service, StockLevelQuery,
    StockLevels, TrackingData, TrackingOptions,
};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::config::ServiceConfig;
use crate::logging::{redact, truncate, with_escaped_forms, xml_escaped};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Transport, TransportError, WireRequest};

/// Adapter name used in logs.
pub const NAME: &str = "Webgistix";

pub const FULFILLMENT_URL: &str = "https://www.webgistix.com/XML/CreateOrder.asp";
pub const TEST_FULFILLMENT_URL: &str = "https://www.webgistix.com/XML/CreateOrderTest.asp";
pub const INVENTORY_URL: &str = "https://www.webgistix.com/XML/GetInventory.asp";
pub const TRACKING_URL: &str = "https://www.webgistix.com/XML/GetTracking.asp";

const CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// Shipping method labels and the `ShippingInstructions` code for each.
pub const SHIPPING_METHODS: [(&str, &str); 34] = [
    ("UPS Ground Shipping", "Ground"),
    ("UPS Ground", "Ground"),
    ("UPS Standard Shipping (Canada Only)", "Standard"),
    ("UPS Standard Shipping (CA & MX Only)", "Standard"),
    ("UPS 3-Business Day", "3-Day Select"),
    ("UPS 2-Business Day", "2nd Day Air"),
    ("UPS 2-Business Day AM", "2nd Day Air AM"),
    ("UPS Next Day", "Next Day Air"),
    ("UPS Next Day Saver", "Next Day Air Saver"),
    ("UPS Next Day Early AM", "Next Day Air Early AM"),
    ("UPS Worldwide Express (Next Day)", "Worldwide Express"),
    ("UPS Worldwide Expedited (2nd Day)", "Worldwide Expedited"),
    ("UPS Worldwide Express Saver", "Worldwide Express Saver"),
    ("FedEx Priority Overnight", "FedEx Priority Overnight"),
    ("FedEx Standard Overnight", "FedEx Standard Overnight"),
    ("FedEx First Overnight", "FedEx First Overnight"),
    ("FedEx 2nd Day", "FedEx 2nd Day"),
    ("FedEx Express Saver", "FedEx Express Saver"),
    ("FedEx International Priority", "FedEx International Priority"),
    ("FedEx International Economy", "FedEx International Economy"),
    ("FedEx International First", "FedEx International First"),
    ("FedEx Ground", "FedEx Ground"),
    ("USPS Priority Mail", "Priority Mail"),
    ("USPS Priority Mail International", "Priority Mail International"),
    ("USPS Priority Mail Small Flat Rate Box", "Priority Mail Small Flat Rate Box"),
    ("USPS Priority Mail Medium Flat Rate Box", "Priority Mail Medium Flat Rate Box"),
    ("USPS Priority Mail Large Flat Rate Box", "Priority Mail Large Flat Rate Box"),
    ("USPS Priority Mail Flat Rate Envelope", "Priority Mail Flat Rate Envelope"),
    ("USPS First Class Mail", "First Class"),
    ("USPS First Class International", "First Class International"),
    ("USPS Express Mail", "Express"),
    ("USPS Express Mail International", "Express Mail International"),
    ("USPS Parcel Post", "Parcel"),
    ("USPS Media Mail", "Media Mail"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Fulfillment,
    Inventory,
    Tracking,
}

impl Action {
    const fn name(self) -> &'static str {
        match self {
            Self::Fulfillment => "fulfillment",
            Self::Inventory => "inventory",
            Self::Tracking => "tracking",
        }
    }
}

/// Webgistix adapter.
#[derive(Debug, Clone)]
pub struct WebgistixService<T = HttpTransport> {
    config: ServiceConfig,
    transport: T,
}

impl WebgistixService<HttpTransport> {
    /// Create an adapter that talks HTTPS. `login` is the customer id and
    /// `secret_key` the account password.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> WebgistixService<T> {
    #[must_use]
    pub const fn with_transport(config: ServiceConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn shipping_methods() -> &'static [(&'static str, &'static str)] {
        &SHIPPING_METHODS
    }

    const fn url(&self, action: Action) -> &'static str {
        match action {
            Action::Fulfillment if self.config.test_mode() => TEST_FULFILLMENT_URL,
            Action::Fulfillment => FULFILLMENT_URL,
            Action::Inventory => INVENTORY_URL,
            Action::Tracking => TRACKING_URL,
        }
    }

    async fn commit(
        &self,
        action: Action,
        body: String,
        retry: RetryPolicy,
    ) -> Result<String, TransportError> {
        let url = self.url(action);

        let mut secrets = self.config.log_filters();
        let password = self.config.secret_key().expose_secret();
        if !password.is_empty() {
            secrets.push(password);
        }
        let filters = with_escaped_forms(&secrets, xml_escaped);
        info!(action = action.name(), url, request = %redact(&body, &filters), "Webgistix request");

        let request = WireRequest::post(url, body)
            .header("EndPointURL", url)
            .header("Content-Type", CONTENT_TYPE);

        let max_log = self.config.max_response_log_size();
        match retry.run(|| self.transport.execute(request.clone())).await {
            Ok(body) => {
                info!(action = action.name(), response = %truncate(&body, max_log), "Webgistix response");
                Ok(body)
            }
            Err(e) => {
                warn!(action = action.name(), error = %e, "Webgistix request failed");
                Err(e)
            }
        }
    }

    async fn submit_order(&self, body: String) -> Response {
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Action::Fulfillment, body, RetryPolicy::none()).await {
            Ok(body) => parse::parse_fulfillment(&body, max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };
        response.with_test(self.config.test_mode())
    }
}

impl<T: Transport> Service for WebgistixService<T> {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn fulfill(&self, order: &FulfillmentOrderRequest) -> Result<Response, RequestError> {
        let shipping_method = order.require_shipping_method()?;
        let body = request::fulfillment_xml(&self.config, order, shipping_method);
        Ok(self.submit_order(body).await)
    }

    #[instrument(skip(self, query), fields(skus = query.skus.len()))]
    async fn fetch_stock_levels(&self, query: &StockLevelQuery) -> Response<StockLevels> {
        let retry = RetryPolicy::new(query.max_retries);
        let body = request::inventory_xml(&self.config);
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Action::Inventory, body, retry).await {
            Ok(body) => parse::parse_inventory(&body, max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };

        let response = if query.skus.is_empty() {
            response
        } else {
            response.map_data(|levels| {
                levels
                    .into_iter()
                    .filter(|(sku, _)| query.skus.contains(sku))
                    .collect()
            })
        };
        response.with_test(self.config.test_mode())
    }

    #[instrument(skip(self, order_ids, options), fields(orders = order_ids.len()))]
    async fn fetch_tracking_data(
        &self,
        order_ids: &[OrderId],
        options: &TrackingOptions,
    ) -> Response<TrackingData> {
        let retry = RetryPolicy::new(options.max_retries);
        let body = request::tracking_xml(&self.config, order_ids);
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Action::Tracking, body, retry).await {
            Ok(body) => parse::parse_tracking(&body, max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };
        response.with_test(self.config.test_mode())
    }

    /// Submits an empty order. Anything but an "Invalid Credentials" reply
    /// means the login was accepted.
    async fn valid_credentials(&self) -> bool {
        let empty_order = FulfillmentOrderRequest::new("", Address::default(), Vec::new());
        let body = request::fulfillment_xml(&self.config, &empty_order, "");
        self.submit_order(body).await.message() != Some(parse::INVALID_LOGIN)
    }

    fn test_mode(&self) -> bool {
        self.config.test_mode()
    }

    fn supports_test_mode(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use fulfillment_core::LineItem;

    fn service(test_mode: bool) -> WebgistixService<ScriptedTransport> {
        WebgistixService::with_transport(
            ServiceConfig::new("cody@example.com", "test").with_test_mode(test_mode),
            ScriptedTransport::new(),
        )
    }

    fn order() -> FulfillmentOrderRequest {
        FulfillmentOrderRequest::new(
            "123456",
            Address::new("Fred Brooks", "1234 Penny Lane", "Jonsetown", "US", "23456"),
            vec![LineItem::new("9999", 25)],
        )
        .with_shipping_method("UPS Ground")
    }

    #[tokio::test]
    async fn test_fulfill_posts_to_test_endpoint_in_test_mode() {
        let service = service(true);
        service
            .transport()
            .push_body("<Completed><Success>True</Success><OrderID>619669</OrderID></Completed>");

        let response = service.fulfill(&order()).await.unwrap();
        assert!(response.is_success());
        assert!(response.is_test());
        assert_eq!(response.get("order_id"), Some("619669"));

        let requests = service.transport().requests();
        assert_eq!(requests[0].url, TEST_FULFILLMENT_URL);
        assert_eq!(requests[0].header_value("EndPointURL"), Some(TEST_FULFILLMENT_URL));
        assert_eq!(requests[0].header_value("Content-Type"), Some(CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_fulfill_posts_to_live_endpoint() {
        let service = service(false);
        service.transport().push_body("<Completed><Success>True</Success></Completed>");

        let response = service.fulfill(&order()).await.unwrap();
        assert!(!response.is_test());
        assert_eq!(service.transport().requests()[0].url, FULFILLMENT_URL);
    }

    #[tokio::test]
    async fn test_fulfill_requires_shipping_method() {
        let service = service(true);
        let mut order = order();
        order.shipping_method = None;

        assert_eq!(
            service.fulfill(&order).await.unwrap_err(),
            RequestError::MissingField("shipping_method")
        );
        assert_eq!(service.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let service = service(true);
        service
            .transport()
            .push_body("<Errors><Error>No Address Line 1</Error></Errors>")
            .push_body("<Errors><Error>Invalid Credentials</Error></Errors>");

        assert!(service.valid_credentials().await);
        assert!(!service.valid_credentials().await);
    }

    #[tokio::test]
    async fn test_stock_levels_filtered_to_requested_skus() {
        let service = service(false);
        service.transport().push_body(
            "<InventoryXML><Item><ItemID>A</ItemID><ItemQty>1</ItemQty></Item>\
             <Item><ItemID>B</ItemID><ItemQty>2</ItemQty></Item></InventoryXML>",
        );

        let response = service
            .fetch_stock_levels(&StockLevelQuery::for_skus(["B"]))
            .await;
        assert!(response.is_success());
        assert_eq!(response.stock_levels().len(), 1);
        assert_eq!(response.stock_levels().get("B"), Some(&2));
        assert_eq!(service.transport().requests()[0].url, INVENTORY_URL);
    }

    #[tokio::test]
    async fn test_transport_failure_is_failed_response() {
        let service = service(false);
        service.transport().push_status(500, "");

        let response = service
            .fetch_tracking_data(&[OrderId::new("AB12345")], &TrackingOptions::default())
            .await;
        assert!(!response.is_success());
        assert_eq!(response.get("http_code"), Some("500"));
        assert_eq!(response.message(), Some(parse::FAILURE_MESSAGE));
    }

    #[test]
    fn test_supports_test_mode() {
        assert!(service(false).supports_test_mode());
        assert!(
            WebgistixService::<ScriptedTransport>::shipping_methods()
                .contains(&("UPS Ground", "Ground"))
        );
    }
}
