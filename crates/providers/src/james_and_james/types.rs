//! JSON payloads.

use std::collections::BTreeMap;

use fulfillment_core::{Address, FulfillmentOrderRequest, LineItem, Sku, non_blank};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder postcode for addresses without one.
pub const MISSING_POSTCODE: &str = "-";

/// Body of an order submission.
#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub api_key: &'a str,
    pub test: bool,
    pub order: Order<'a>,
}

#[derive(Debug, Serialize)]
pub struct Order<'a> {
    pub client_ref: &'a str,
    #[serde(rename = "ShippingContact")]
    pub shipping_contact: Contact<'a>,
    #[serde(rename = "BillingContact")]
    pub billing_contact: Contact<'a>,
    pub items: Vec<Item<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_placed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postage_speed: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct Contact<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub postcode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_contd: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<&'a str>,
}

impl<'a> From<&'a Address> for Contact<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            address: &address.address1,
            city: &address.city,
            country: &address.country,
            postcode: non_blank(Some(address.zip.as_str())).unwrap_or(MISSING_POSTCODE),
            company: non_blank(address.company.as_deref()),
            email: non_blank(address.email.as_deref()),
            address_contd: non_blank(address.address2.as_deref()),
            county: non_blank(address.state.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Item<'a> {
    pub client_ref: Option<&'a str>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
}

impl<'a> From<&'a LineItem> for Item<'a> {
    fn from(item: &'a LineItem) -> Self {
        Self {
            client_ref: item.sku.as_ref().map(Sku::as_str),
            quantity: item.quantity,
            price: item.declared_value,
        }
    }
}

impl<'a> OrderRequest<'a> {
    /// Build the submission body. The billing address has already been
    /// checked by the caller.
    pub fn new(
        api_key: &'a str,
        test: bool,
        order: &'a FulfillmentOrderRequest,
        billing: &'a Address,
    ) -> Self {
        Self {
            api_key,
            test,
            order: Order {
                client_ref: order.order_id.as_str(),
                shipping_contact: Contact::from(&order.shipping_address),
                billing_contact: Contact::from(billing),
                items: order.line_items.iter().map(Item::from).collect(),
                date_placed: order
                    .order_date
                    .map(|date| date.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
                postage_speed: non_blank(order.shipping_method.as_deref()),
                notes: order.comment(),
            },
        }
    }
}

/// Fields every reply carries. Everything else is kept as params.
#[derive(Debug, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub test: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a stock reply.
#[derive(Debug, Default, Deserialize)]
pub struct StockReply {
    #[serde(default)]
    pub stock: BTreeMap<Sku, i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn address() -> Address {
        Address::new("Fred Brooks", "1234 Penny Lane", "Jonsetown", "US", "23456")
            .with_state("NC")
            .with_email("buyer@jadedpallet.com")
    }

    #[test]
    fn test_order_request_shape() {
        let billing = address().with_company("Jaded Pallet");
        let order = FulfillmentOrderRequest::new(
            "123456",
            address(),
            vec![LineItem::new("9999", 25).with_declared_value(Decimal::new(1250, 2), "GBP")],
        )
        .with_order_date(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
        .with_billing_address(billing.clone());

        let body = serde_json::to_value(OrderRequest::new("secret", true, &order, &billing)).unwrap();

        assert_eq!(body["api_key"], "secret");
        assert_eq!(body["test"], true);
        assert_eq!(body["order"]["client_ref"], "123456");
        assert_eq!(body["order"]["date_placed"], "2024-05-01T09:30:00Z");
        assert_eq!(
            body["order"]["ShippingContact"],
            json!({
                "name": "Fred Brooks",
                "address": "1234 Penny Lane",
                "city": "Jonsetown",
                "country": "US",
                "postcode": "23456",
                "email": "buyer@jadedpallet.com",
                "county": "NC",
            })
        );
        assert_eq!(body["order"]["BillingContact"]["company"], "Jaded Pallet");
        assert_eq!(body["order"]["items"][0]["client_ref"], "9999");
        assert_eq!(body["order"]["items"][0]["quantity"], 25);
        assert_eq!(body["order"]["items"][0]["price"], "12.50");
        assert!(body["order"].get("postage_speed").is_none());
    }

    #[test]
    fn test_blank_postcode_is_placeholder() {
        let address = Address::new("n", "a", "c", "GB", " ");
        assert_eq!(Contact::from(&address).postcode, MISSING_POSTCODE);
    }

    #[test]
    fn test_stock_reply() {
        let reply: StockReply =
            serde_json::from_str(r#"{"success": true, "stock": {"AAA": 99, "BBB": 9}, "test": true}"#)
                .unwrap();
        assert_eq!(reply.stock.get("AAA"), Some(&99));
        assert_eq!(reply.stock.get("BBB"), Some(&9));
    }

    #[test]
    fn test_reply_defaults() {
        let reply: Reply = serde_json::from_str("{}").unwrap();
        assert!(!reply.success);
        assert!(reply.test.is_none());
    }
}
