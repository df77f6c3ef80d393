//! Parameter maps for each marketplace action.
//!
//! Builders take the current time as an argument so that requests are
//! reproducible in tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use fulfillment_core::{
    Address, FulfillmentOrderRequest, LineItem, OrderId, RequestError, StockLevelQuery, non_blank,
};

use crate::config::ServiceConfig;

/// API version sent with every request.
pub const VERSION: &str = "2010-10-01";

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";

/// Response group requested when listing inventory.
pub const DEFAULT_RESPONSE_GROUP: &str = "Basic";

/// Sorted request parameters, before signing.
pub type QueryParams = BTreeMap<String, String>;

/// API section a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Outbound,
    Inventory,
}

impl Section {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Outbound => "FulfillmentOutboundShipment",
            Self::Inventory => "FulfillmentInventory",
        }
    }

    /// Request path, also used when signing.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}/{VERSION}", self.name())
    }
}

/// ISO-8601 UTC timestamp with second precision, e.g. `2024-05-01T12:00:00Z`.
#[must_use]
pub fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parameters common to every action: identity, timestamp, version and signing scheme.
#[must_use]
pub fn basic_params(config: &ServiceConfig, action: &str, now: DateTime<Utc>) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("Action".into(), action.into());
    params.insert("AWSAccessKeyId".into(), config.login().into());
    params.insert("Timestamp".into(), timestamp(now));
    params.insert("Version".into(), VERSION.into());
    params.insert("SignatureMethod".into(), SIGNATURE_METHOD.into());
    params.insert("SignatureVersion".into(), SIGNATURE_VERSION.into());

    if let Some(seller_id) = non_blank(config.seller_id()) {
        params.insert("SellerId".into(), seller_id.into());
    }
    if let Some(token) = non_blank(config.auth_token()) {
        params.insert("MWSAuthToken".into(), token.into());
    }

    params
}

/// `CreateFulfillmentOrder`.
///
/// # Errors
///
/// Returns `RequestError::MissingField` when the order date, shipping
/// method or a required address field is missing.
pub fn fulfillment_params(
    config: &ServiceConfig,
    order: &FulfillmentOrderRequest,
    now: DateTime<Utc>,
) -> Result<QueryParams, RequestError> {
    let order_date = order.require_order_date()?;
    let shipping_method = order.require_shipping_method()?;

    let mut params = basic_params(config, "CreateFulfillmentOrder", now);
    params.insert("SellerFulfillmentOrderId".into(), order.order_id.to_string());
    params.insert("DisplayableOrderId".into(), order.order_id.to_string());
    params.insert("DisplayableOrderDateTime".into(), timestamp(order_date));
    params.insert("ShippingSpeedCategory".into(), shipping_method.into());
    params.insert("MarketplaceId".into(), config.region().marketplace_id().into());

    if let Some(comment) = order.comment() {
        params.insert("DisplayableOrderComment".into(), comment.into());
    }

    params.extend(address_params(&order.shipping_address)?);
    params.extend(item_params(&order.line_items));

    Ok(params)
}

/// `DestinationAddress.*` fields. Blank optional values are left out.
///
/// # Errors
///
/// Returns `RequestError::MissingField` for a blank required field.
pub fn address_params(address: &Address) -> Result<QueryParams, RequestError> {
    address.validate()?;

    let fields = [
        ("Name", Some(address.recipient_name())),
        ("Line1", Some(address.address1.clone())),
        ("Line2", address.address2.clone()),
        ("City", Some(address.city.clone())),
        ("StateOrProvinceCode", Some(address.state_or_placeholder().to_string())),
        ("CountryCode", Some(address.country.clone())),
        ("PostalCode", Some(address.normalized_zip())),
        ("PhoneNumber", address.phone.clone()),
    ];

    Ok(fields
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| (format!("DestinationAddress.{field}"), v))
        })
        .collect())
}

/// `Items.member.N.*` fields, numbered from 1.
#[must_use]
pub fn item_params(items: &[LineItem]) -> QueryParams {
    let mut params = QueryParams::new();

    for (index, item) in items.iter().enumerate().map(|(i, item)| (i + 1, item)) {
        let key = |field: &str| format!("Items.member.{index}.{field}");
        let sku = item.sku_or_placeholder(index);

        let item_id = item
            .sku
            .as_ref()
            .map(ToString::to_string)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("FULFILLMENT-ITEM-ID-{index}"));

        params.insert(key("SellerSKU"), sku);
        params.insert(key("SellerFulfillmentOrderItemId"), item_id);
        params.insert(key("Quantity"), item.quantity_or_default().to_string());

        if let Some(comment) = non_blank(item.comment.as_deref()) {
            params.insert(key("DisplayableComment"), comment.into());
        }
        if let Some(message) = non_blank(item.gift_message.as_deref()) {
            params.insert(key("GiftMessage"), message.into());
        }
        if let Some(value) = item.declared_value {
            params.insert(key("PerUnitDeclaredValue.Value"), value.to_string());
        }
        if let Some(currency) = non_blank(item.currency_code.as_deref()) {
            params.insert(key("PerUnitDeclaredValue.CurrencyCode"), currency.into());
        }
    }

    params
}

/// `ListInventorySupply`, scoped to explicit SKUs or to changes since a start time.
#[must_use]
pub fn inventory_params(
    config: &ServiceConfig,
    query: &StockLevelQuery,
    now: DateTime<Utc>,
) -> QueryParams {
    let mut params = basic_params(config, "ListInventorySupply", now);
    let response_group = non_blank(query.response_group.as_deref()).unwrap_or(DEFAULT_RESPONSE_GROUP);
    params.insert("ResponseGroup".into(), response_group.into());

    if query.skus.is_empty() {
        let start = query.start_time.unwrap_or(now - Duration::days(1));
        params.insert("QueryStartDateTime".into(), timestamp(start));
    } else {
        for (index, sku) in query.skus.iter().enumerate() {
            params.insert(format!("SellerSkus.member.{}", index + 1), sku.to_string());
        }
    }

    params
}

/// `ListInventorySupplyByNextToken`.
#[must_use]
pub fn next_inventory_params(config: &ServiceConfig, token: &str, now: DateTime<Utc>) -> QueryParams {
    let mut params = basic_params(config, "ListInventorySupplyByNextToken", now);
    params.insert("NextToken".into(), token.into());
    params
}

/// `GetFulfillmentOrder`.
#[must_use]
pub fn tracking_params(config: &ServiceConfig, order_id: &OrderId, now: DateTime<Utc>) -> QueryParams {
    let mut params = basic_params(config, "GetFulfillmentOrder", now);
    params.insert("SellerFulfillmentOrderId".into(), order_id.to_string());
    params
}

/// `ListAllFulfillmentOrders` since `start` (default: one day before `now`).
#[must_use]
pub fn current_orders_params(
    config: &ServiceConfig,
    start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> QueryParams {
    let start = start.unwrap_or(now - Duration::days(1));
    let mut params = basic_params(config, "ListAllFulfillmentOrders", now);
    params.insert(
        "QueryStartDateTime".into(),
        start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    );
    params
}

/// `GetServiceStatus`.
#[must_use]
pub fn service_status_params(config: &ServiceConfig, now: DateTime<Utc>) -> QueryParams {
    basic_params(config, "GetServiceStatus", now)
}
