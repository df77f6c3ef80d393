//! James & James warehouse (JSON over HTTPS).
//!
//! Each account has its own subdomain of `sixworks.co.uk`; the configured
//! `login` is that subdomain and `secret_key` the API key. Orders are
//! posted as JSON, stock is a `GET` with the key in the query string.
//! Every reply carries a `success` flag and echoes the `test` flag back.

pub mod types;

use fulfillment_core::{
    FulfillmentOrderRequest, OrderId, Params, RequestError, Response, Service, StockLevelQuery,
    StockLevels, TrackingData, TrackingOptions,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use self::types::{OrderRequest, Reply, StockReply};
use crate::config::{ConfigError, ServiceConfig};
use crate::logging::{json_escaped, redact, truncate, with_escaped_forms};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Transport, TransportError, WireRequest};

/// Adapter name used in logs.
pub const NAME: &str = "James & James";

const HOST_SUFFIX: &str = "sixworks.co.uk";
const API_PATH: &str = "/api/1/";

pub const TRACKING_UNSUPPORTED: &str = "James & James does not provide tracking data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Fulfill,
    Stock,
}

impl Operation {
    const fn name(self) -> &'static str {
        match self {
            Self::Fulfill => "fulfill",
            Self::Stock => "stock",
        }
    }

    const fn message(self, success: bool) -> &'static str {
        match (self, success) {
            (Self::Fulfill, true) => "Successfully submitted the order",
            (Self::Fulfill, false) => "Failed to submit the order",
            (Self::Stock, true) => "Fetched stock levels",
            (Self::Stock, false) => "Failed to fetch stock levels",
        }
    }
}

/// Validate the account subdomain and build the API base URL from it.
fn base_url(subdomain: &str) -> Result<Url, ConfigError> {
    let valid = !subdomain.is_empty()
        && !subdomain.starts_with('-')
        && subdomain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(ConfigError::InvalidLogin(subdomain.to_string()));
    }

    Url::parse(&format!("https://{subdomain}.{HOST_SUFFIX}{API_PATH}"))
        .map_err(|e| ConfigError::InvalidLogin(format!("{subdomain}: {e}")))
}

/// James & James adapter.
#[derive(Debug, Clone)]
pub struct JamesAndJamesService<T = HttpTransport> {
    config: ServiceConfig,
    transport: T,
    fulfillment_url: Url,
    stock_url: Url,
}

impl JamesAndJamesService<HttpTransport> {
    /// Create an adapter that talks HTTPS.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLogin` if `login` is not a usable subdomain.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> JamesAndJamesService<T> {
    /// Create an adapter over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLogin` if `login` is not a usable subdomain.
    pub fn with_transport(config: ServiceConfig, transport: T) -> Result<Self, ConfigError> {
        let fulfillment_url = base_url(config.login())?;
        let stock_url = fulfillment_url
            .join("stock")
            .map_err(|e| ConfigError::InvalidLogin(e.to_string()))?;

        Ok(Self {
            config,
            transport,
            fulfillment_url,
            stock_url,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Order submission endpoint.
    #[must_use]
    pub fn fulfillment_url(&self) -> &str {
        self.fulfillment_url.as_str()
    }

    fn api_key(&self) -> &str {
        self.config.secret_key().expose_secret()
    }

    fn stock_request(&self) -> WireRequest {
        let mut url = self.stock_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", self.api_key())
            .append_pair("test", if self.config.test_mode() { "true" } else { "false" });

        WireRequest::get(url.as_str()).header("Accept", "application/json")
    }

    // =========================================================================
    // Wire
    // =========================================================================

    async fn commit(
        &self,
        operation: Operation,
        request: WireRequest,
        retry: RetryPolicy,
    ) -> Result<String, TransportError> {
        let mut secrets = self.config.log_filters();
        if !self.api_key().is_empty() {
            secrets.push(self.api_key());
        }
        let filters = with_escaped_forms(&secrets, json_escaped);
        info!(
            operation = operation.name(),
            url = %redact(&request.url, &filters),
            body = %redact(request.body.as_deref().unwrap_or_default(), &filters),
            "James & James request"
        );

        let max_log = self.config.max_response_log_size();
        match retry.run(|| self.transport.execute(request.clone())).await {
            Ok(body) => {
                info!(operation = operation.name(), response = %truncate(&body, max_log), "James & James response");
                Ok(body)
            }
            Err(e) => {
                warn!(operation = operation.name(), error = %e, "James & James request failed");
                Err(e)
            }
        }
    }

    /// Fold a reply into a [`Response`].
    ///
    /// Every top-level field is kept as a param. `payload` extracts typed
    /// data from the reply; it only contributes when `success` is true.
    fn classify<D: Default>(
        &self,
        operation: Operation,
        result: Result<String, TransportError>,
        payload: impl FnOnce(&Value) -> serde_json::Result<D>,
    ) -> Response<D> {
        let max_log = self.config.max_response_log_size();

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                return Response::failed(e.summary(), e.diagnostic_params(max_log))
                    .with_test(self.config.test_mode());
            }
        };

        let parsed = serde_json::from_str::<Value>(&body).and_then(|value| {
            let reply = Reply::deserialize(&value)?;
            let data = payload(&value)?;
            Ok((value, reply, data))
        });

        let (value, reply, data) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                let mut params = Params::new();
                params.insert("http_body", truncate(&body, max_log).into_owned());
                return Response::failed(format!("Malformed response: {e}"), params)
                    .with_test(self.config.test_mode());
            }
        };

        let params: Params = match value {
            Value::Object(fields) => fields.into_iter().collect(),
            _ => Params::new(),
        };
        let message = reply
            .message
            .unwrap_or_else(|| operation.message(reply.success).to_string());
        let data = if reply.success { data } else { D::default() };

        Response::new(reply.success, Some(message), params, data)
            .with_test(reply.test.unwrap_or(self.config.test_mode()))
    }

    async fn fetch_stock(&self, retry: RetryPolicy) -> Response<StockLevels> {
        let result = self.commit(Operation::Stock, self.stock_request(), retry).await;
        self.classify(Operation::Stock, result, |value| {
            StockReply::deserialize(value).map(|reply| reply.stock)
        })
    }
}

impl<T: Transport> Service for JamesAndJamesService<T> {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn fulfill(&self, order: &FulfillmentOrderRequest) -> Result<Response, RequestError> {
        let billing = order.require_billing_address()?;
        let body = OrderRequest::new(self.api_key(), self.config.test_mode(), order, billing);
        let body = serde_json::to_string(&body).map_err(|e| RequestError::InvalidField {
            field: "order",
            reason: e.to_string(),
        })?;

        let request = WireRequest::post(self.fulfillment_url.as_str(), body)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        let result = self
            .commit(Operation::Fulfill, request, RetryPolicy::none())
            .await;
        Ok(self.classify(Operation::Fulfill, result, |_| Ok(())))
    }

    #[instrument(skip(self, query), fields(skus = query.skus.len()))]
    async fn fetch_stock_levels(&self, query: &StockLevelQuery) -> Response<StockLevels> {
        let response = self.fetch_stock(RetryPolicy::new(query.max_retries)).await;
        if query.skus.is_empty() {
            return response;
        }

        response.map_data(|levels| {
            levels
                .into_iter()
                .filter(|(sku, _)| query.skus.contains(sku))
                .collect()
        })
    }

    /// Not offered by this provider; always a failed response.
    async fn fetch_tracking_data(
        &self,
        _order_ids: &[OrderId],
        _options: &TrackingOptions,
    ) -> Response<TrackingData> {
        let mut params = Params::new();
        params.insert("response_comment", TRACKING_UNSUPPORTED);
        Response::failed(TRACKING_UNSUPPORTED, params).with_test(self.config.test_mode())
    }

    async fn valid_credentials(&self) -> bool {
        self.fetch_stock(RetryPolicy::none()).await.is_success()
    }

    fn test_mode(&self) -> bool {
        self.config.test_mode()
    }

    fn supports_test_mode(&self) -> bool {
        true
    }
}
