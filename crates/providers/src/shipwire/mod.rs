//! Shipwire warehouse (form-posted XML over HTTPS).
//!
//! Each operation form-encodes one XML document under its own variable and
//! posts it to an operation-specific endpoint. The account email address
//! and password travel inside the document, along with the `Server`
//! (`Test` or `Production`) that selects the sandbox.
//!
//! Tracking replies carry the carrier and a tracking URL for every shipped
//! order, so this is the one XML adapter that fills `tracking_urls`.

pub mod parse;
pub mod request;

use fulfillment_core::{
    FulfillmentOrderRequest, OrderId, RequestError, Response, Service, StockLevelQuery,
    StockLevels, TrackingData, TrackingOptions,
};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::config::ServiceConfig;
use crate::logging::{redact, truncate, with_escaped_forms, xml_escaped};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Transport, TransportError, WireRequest};

/// Adapter name used in logs.
pub const NAME: &str = "Shipwire";

pub const FULFILLMENT_URL: &str = "https://api.shipwire.com/exec/FulfillmentServices.php";
pub const INVENTORY_URL: &str = "https://api.shipwire.com/exec/InventoryServices.php";
pub const TRACKING_URL: &str = "https://api.shipwire.com/exec/TrackingServices.php";

const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Warehouse codes and the name the inventory report expects.
pub const WAREHOUSES: [(&str, &str); 6] = [
    ("CHI", "Chicago"),
    ("LAX", "Los Angeles"),
    ("REN", "Reno"),
    ("VAN", "Vancouver"),
    ("TOR", "Toronto"),
    ("UK", "United Kingdom"),
];

/// Shipping method labels and the `Shipping` code for each.
pub const SHIPPING_METHODS: [(&str, &str); 5] = [
    ("1 Day Service", "1D"),
    ("2 Day Service", "2D"),
    ("Ground Service", "GD"),
    ("Freight Service", "FT"),
    ("International", "INTL"),
];

/// Name of the warehouse with `code`, if known.
#[must_use]
pub fn warehouse_name(code: &str) -> Option<&'static str> {
    WAREHOUSES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// The code for a shipping method label. Codes and unknown labels pass through.
#[must_use]
pub fn shipping_code(method: &str) -> &str {
    SHIPPING_METHODS
        .iter()
        .find(|(label, _)| *label == method)
        .map_or(method, |(_, code)| *code)
}

/// Account options beyond the credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipwireOptions {
    /// Partner id sent as `AffiliateId` with every request.
    pub affiliate_id: Option<String>,
    /// Warehouse code (see [`WAREHOUSES`]) orders ship from and stock is read for.
    pub warehouse: Option<String>,
    /// Add pending stock to reported quantities.
    pub include_pending_stock: bool,
    /// Report products with no stock.
    pub include_empty_stock: bool,
}

impl ShipwireOptions {
    #[must_use]
    pub fn with_affiliate_id(mut self, affiliate_id: impl Into<String>) -> Self {
        self.affiliate_id = Some(affiliate_id.into());
        self
    }

    #[must_use]
    pub fn with_warehouse(mut self, code: impl Into<String>) -> Self {
        self.warehouse = Some(code.into());
        self
    }

    #[must_use]
    pub const fn with_include_pending_stock(mut self, include: bool) -> Self {
        self.include_pending_stock = include;
        self
    }

    #[must_use]
    pub const fn with_include_empty_stock(mut self, include: bool) -> Self {
        self.include_empty_stock = include;
        self
    }
}

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

    const fn url(self) -> &'static str {
        match self {
            Self::Fulfillment => FULFILLMENT_URL,
            Self::Inventory => INVENTORY_URL,
            Self::Tracking => TRACKING_URL,
        }
    }

    /// Form variable carrying the document.
    const fn variable(self) -> &'static str {
        match self {
            Self::Fulfillment => "OrderListXML",
            Self::Inventory => "InventoryUpdateXML",
            Self::Tracking => "TrackingUpdateXML",
        }
    }
}

/// Shipwire adapter.
#[derive(Debug, Clone)]
pub struct ShipwireService<T = HttpTransport> {
    config: ServiceConfig,
    options: ShipwireOptions,
    transport: T,
}

impl ShipwireService<HttpTransport> {
    /// Create an adapter that talks HTTPS. `login` is the account email
    /// address and `secret_key` its password.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> ShipwireService<T> {
    #[must_use]
    pub fn with_transport(config: ServiceConfig, transport: T) -> Self {
        Self {
            config,
            options: ShipwireOptions::default(),
            transport,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ShipwireOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub const fn options(&self) -> &ShipwireOptions {
        &self.options
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn shipping_methods() -> &'static [(&'static str, &'static str)] {
        &SHIPPING_METHODS
    }

    async fn commit(
        &self,
        action: Action,
        document: &str,
        retry: RetryPolicy,
    ) -> Result<String, TransportError> {
        let url = action.url();

        let mut secrets = self.config.log_filters();
        let password = self.config.secret_key().expose_secret();
        if !password.is_empty() {
            secrets.push(password);
        }
        let filters = with_escaped_forms(&secrets, xml_escaped);
        info!(action = action.name(), url, request = %redact(document, &filters), "Shipwire request");

        let request = WireRequest::post(url, request::form_body(action.variable(), document))
            .header("Content-Type", CONTENT_TYPE);

        let max_log = self.config.max_response_log_size();
        match retry.run(|| self.transport.execute(request.clone())).await {
            Ok(body) => {
                info!(action = action.name(), response = %truncate(&body, max_log), "Shipwire response");
                Ok(body)
            }
            Err(e) => {
                warn!(action = action.name(), error = %e, "Shipwire request failed");
                Err(e)
            }
        }
    }
}

impl<T: Transport> Service for ShipwireService<T> {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn fulfill(&self, order: &FulfillmentOrderRequest) -> Result<Response, RequestError> {
        let document = request::fulfillment_xml(&self.config, &self.options, order);
        let max_log = self.config.max_response_log_size();

        let response = match self
            .commit(Action::Fulfillment, &document, RetryPolicy::none())
            .await
        {
            Ok(body) => parse::parse_fulfillment(&body, max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };
        Ok(response.with_test(self.config.test_mode()))
    }

    /// A single requested SKU is asked for by `ProductCode`; otherwise the
    /// whole warehouse is listed and filtered locally.
    #[instrument(skip(self, query), fields(skus = query.skus.len()))]
    async fn fetch_stock_levels(&self, query: &StockLevelQuery) -> Response<StockLevels> {
        let retry = RetryPolicy::new(query.max_retries);
        let only = match query.skus.as_slice() {
            [sku] => Some(sku),
            _ => None,
        };
        let document = request::inventory_xml(&self.config, &self.options, only);
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Action::Inventory, &document, retry).await {
            Ok(body) => parse::parse_inventory(
                &body,
                self.config.test_mode(),
                self.options.include_pending_stock,
                max_log,
            ),
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
        let document = request::tracking_xml(&self.config, &self.options, order_ids);
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Action::Tracking, &document, retry).await {
            Ok(body) => parse::parse_tracking(&body, self.config.test_mode(), max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };
        response.with_test(self.config.test_mode())
    }

    /// Asks for tracking on no orders. Anything but a rejected-login
    /// message means the credentials were accepted.
    async fn valid_credentials(&self) -> bool {
        let response = self
            .fetch_tracking_data(&[], &TrackingOptions::default())
            .await;
        !response.message().is_some_and(parse::is_invalid_login)
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
    use fulfillment_core::{Address, LineItem};

    fn service(test_mode: bool) -> ShipwireService<ScriptedTransport> {
        ShipwireService::with_transport(
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
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(warehouse_name("REN"), Some("Reno"));
        assert_eq!(warehouse_name("01"), None);
        assert_eq!(shipping_code("International"), "INTL");
        assert_eq!(shipping_code("GD"), "GD");
        assert!(service(false).supports_test_mode());
    }

    #[tokio::test]
    async fn test_fulfill_posts_form_encoded_document() {
        let service = service(false);
        service
            .transport()
            .push_body("<SubmitOrderResponse><Status>0</Status></SubmitOrderResponse>");

        let response = service.fulfill(&order()).await.unwrap();
        assert!(response.is_success());
        assert!(!response.is_test());

        let requests = service.transport().requests();
        assert_eq!(requests[0].url, FULFILLMENT_URL);
        assert_eq!(requests[0].header_value("Content-Type"), Some(CONTENT_TYPE));
        assert!(
            requests[0]
                .body
                .as_deref()
                .unwrap()
                .starts_with("OrderListXML=%3C%3Fxml")
        );
    }

    #[tokio::test]
    async fn test_single_sku_is_asked_for_by_code() {
        let service = service(false);
        service.transport().push_body(
            "<InventoryUpdateResponse><Status>0</Status>\
             <Product code=\"A\" quantity=\"1\"/><Product code=\"B\" quantity=\"2\"/>\
             </InventoryUpdateResponse>",
        );

        let response = service
            .fetch_stock_levels(&StockLevelQuery::for_skus(["B"]))
            .await;
        assert_eq!(response.stock_levels().len(), 1);
        assert_eq!(response.stock_levels().get("B"), Some(&2));

        let body = service.transport().bodies().pop().unwrap();
        assert!(body.starts_with("InventoryUpdateXML="));
        assert!(body.contains("%3CProductCode%3EB%3C%2FProductCode%3E"));
        assert_eq!(service.transport().requests()[0].url, INVENTORY_URL);
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let service = service(true);
        service
            .transport()
            .push_body("<TrackingUpdateResponse><Status>Test</Status></TrackingUpdateResponse>")
            .push_body(
                "<TrackingUpdateResponse><Status>Error</Status><ErrorMessage>\
                 Could not verify Username/EmailAddress and Password combination\
                 </ErrorMessage></TrackingUpdateResponse>",
            );

        assert!(service.valid_credentials().await);
        assert!(!service.valid_credentials().await);
        assert_eq!(service.transport().requests()[0].url, TRACKING_URL);
    }

    #[tokio::test]
    async fn test_transport_failure_is_failed_response() {
        let service = service(false);
        service.transport().push_status(500, "");

        let response = service
            .fetch_tracking_data(&[OrderId::new("2986")], &TrackingOptions::default())
            .await;
        assert!(!response.is_success());
        assert_eq!(response.get("http_code"), Some("500"));
    }
}
