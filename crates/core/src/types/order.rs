//! Fulfillment order requests and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::{Address, non_blank};
use super::id::{OrderId, Sku};
use crate::error::RequestError;

/// One line of a fulfillment order.
///
/// Every field is optional. Adapters fill in a positional placeholder SKU
/// and a quantity of one so that partial data still yields a well-formed
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: Option<Sku>,
    pub quantity: Option<u32>,
    pub comment: Option<String>,
    pub gift_message: Option<String>,
    pub declared_value: Option<Decimal>,
    pub currency_code: Option<String>,
}

impl LineItem {
    /// Create a line item for `quantity` units of `sku`.
    #[must_use]
    pub fn new(sku: impl Into<Sku>, quantity: u32) -> Self {
        Self {
            sku: Some(sku.into()),
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    /// Attach a per-item comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach a gift message.
    #[must_use]
    pub fn with_gift_message(mut self, message: impl Into<String>) -> Self {
        self.gift_message = Some(message.into());
        self
    }

    /// Attach a per-unit declared value.
    #[must_use]
    pub fn with_declared_value(mut self, value: Decimal, currency: impl Into<String>) -> Self {
        self.declared_value = Some(value);
        self.currency_code = Some(currency.into());
        self
    }

    /// The SKU, or `SKU-<index>` when absent. `index` is 1-based.
    #[must_use]
    pub fn sku_or_placeholder(&self, index: usize) -> String {
        self.sku
            .as_ref()
            .map(Sku::as_str)
            .and_then(|sku| non_blank(Some(sku)))
            .map_or_else(|| format!("SKU-{index}"), str::to_owned)
    }

    /// The quantity, defaulting to one.
    #[must_use]
    pub fn quantity_or_default(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

/// A request to ship goods to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentOrderRequest {
    pub order_id: OrderId,
    pub shipping_address: Address,
    pub line_items: Vec<LineItem>,
    pub order_date: Option<DateTime<Utc>>,
    pub shipping_method: Option<String>,
    pub comment: Option<String>,
    pub billing_address: Option<Address>,
}

impl FulfillmentOrderRequest {
    #[must_use]
    pub fn new(
        order_id: impl Into<OrderId>,
        shipping_address: Address,
        line_items: Vec<LineItem>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            shipping_address,
            line_items,
            order_date: None,
            shipping_method: None,
            comment: None,
            billing_address: None,
        }
    }

    #[must_use]
    pub fn with_order_date(mut self, date: DateTime<Utc>) -> Self {
        self.order_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_shipping_method(mut self, method: impl Into<String>) -> Self {
        self.shipping_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    /// The order date.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::MissingField("order_date")` when unset.
    pub fn require_order_date(&self) -> Result<DateTime<Utc>, RequestError> {
        self.order_date
            .ok_or(RequestError::MissingField("order_date"))
    }

    /// The shipping method.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::MissingField("shipping_method")` when unset or blank.
    pub fn require_shipping_method(&self) -> Result<&str, RequestError> {
        non_blank(self.shipping_method.as_deref())
            .ok_or(RequestError::MissingField("shipping_method"))
    }

    /// The billing address.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::MissingField("billing_address")` when unset.
    pub fn require_billing_address(&self) -> Result<&Address, RequestError> {
        self.billing_address
            .as_ref()
            .ok_or(RequestError::MissingField("billing_address"))
    }

    /// The order comment, if non-blank.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        non_blank(self.comment.as_deref())
    }
}
