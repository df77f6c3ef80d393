//! Response classification.
//!
//! Every reply is a document whose root carries a `Status` child: `0` on
//! success, `Test` for sandbox accounts, anything else with an
//! `ErrorMessage` on failure.

use fulfillment_core::{OrderId, Params, Response, Sku, StockLevels, TrackingData};
use roxmltree::Node;

use crate::logging::truncate;
use crate::transport::TransportError;
use crate::xml;

pub const SUCCESS_STATUS: &str = "0";
pub const TEST_STATUS: &str = "Test";

pub const FULFILLMENT_SUCCESS: &str = "Successfully submitted the order";
pub const STOCK_SUCCESS: &str = "Successfully received the stock levels";
pub const TRACKING_SUCCESS: &str = "Successfully received the tracking numbers";
pub const MALFORMED_RESPONSE: &str = "Malformed response";

/// Error messages that mean the login was rejected.
pub const INVALID_LOGIN_MESSAGES: [&str; 2] = [
    "Error with Valid Username/EmailAddress and Password Required",
    "Could not verify Username/EmailAddress and Password combination",
];

/// Whether `message` reports rejected credentials.
#[must_use]
pub fn is_invalid_login(message: &str) -> bool {
    INVALID_LOGIN_MESSAGES
        .iter()
        .any(|phrase| message.contains(phrase))
}

/// Error text with line breaks dropped and runs of spaces collapsed.
fn message_from(text: Option<&str>) -> Option<String> {
    let text = text?.replace('\n', "");
    let mut message = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' && message.ends_with(' ') {
            continue;
        }
        message.push(c);
    }
    (!message.trim().is_empty()).then_some(message)
}

fn is_success(status: Option<&str>, test_mode: bool) -> bool {
    match status {
        Some(SUCCESS_STATUS) => true,
        Some(TEST_STATUS) => test_mode,
        _ => false,
    }
}

/// Root children other than `Order`, as params.
fn root_params(root: Node<'_, '_>) -> Params {
    root.children()
        .filter(Node::is_element)
        .filter(|n| n.tag_name().name() != "Order")
        .map(|n| (n.tag_name().name().to_string(), xml::text(n)))
        .collect()
}

fn respond<T>(success: bool, on_success: &str, params: Params, data: T) -> Response<T> {
    let message = if success {
        Some(on_success.to_string())
    } else {
        message_from(params.get_str("error_message"))
    };
    Response::new(success, message, params, data)
}

/// Parse `body` and hand the root to `on_document`.
fn with_document<T: Default>(
    body: &str,
    max_log_size: usize,
    on_document: impl FnOnce(Node<'_, '_>) -> Response<T>,
) -> Response<T> {
    match xml::parse(body) {
        Ok(document) => on_document(document.root_element()),
        Err(e) => {
            let mut params = Params::new();
            params.insert("http_body", truncate(body, max_log_size).into_owned());
            Response::failed(format!("{MALFORMED_RESPONSE}: {e}"), params)
        }
    }
}

/// Classify a transport failure.
#[must_use]
pub fn parse_error<T: Default>(error: &TransportError, max_log_size: usize) -> Response<T> {
    Response::failed(error.summary(), error.diagnostic_params(max_log_size))
}

/// `FulfillmentServices.php`. Only a `Status` of `0` accepts the order.
#[must_use]
pub fn parse_fulfillment(body: &str, max_log_size: usize) -> Response {
    with_document(body, max_log_size, |root| {
        let params = root_params(root);
        let success = params.get_str("status") == Some(SUCCESS_STATUS);
        respond(success, FULFILLMENT_SUCCESS, params, ())
    })
}

/// `InventoryServices.php`.
///
/// Sandbox accounts answer `Test`, which only counts in test mode. Each
/// `Product` carries its `code` and `quantity`; `pending` is added when
/// `include_pending` is set. Unparseable quantities count as zero.
#[must_use]
pub fn parse_inventory(
    body: &str,
    test_mode: bool,
    include_pending: bool,
    max_log_size: usize,
) -> Response<StockLevels> {
    with_document(body, max_log_size, |root| {
        let status = xml::text_of(root, "Status");
        let expected = if test_mode { TEST_STATUS } else { SUCCESS_STATUS };
        let success = status.as_deref() == Some(expected);

        let mut params = Params::new();
        for name in ["Status", "TotalProducts", "ErrorMessage"] {
            if let Some(value) = xml::text_of(root, name) {
                params.insert(name, value);
            }
        }

        let mut levels = StockLevels::new();
        for product in xml::find_all(root, "Product") {
            let Some(code) = product.attribute("code") else {
                continue;
            };
            let mut quantity = count(product, "quantity");
            if include_pending {
                quantity += count(product, "pending");
            }
            levels.insert(Sku::new(code), quantity);
        }

        respond(success, STOCK_SUCCESS, params, levels)
    })
}

fn count(product: Node<'_, '_>, attribute: &str) -> i64 {
    product
        .attribute(attribute)
        .and_then(|q| q.trim().parse().ok())
        .unwrap_or(0)
}

/// `TrackingServices.php`.
///
/// Only `Order` elements marked `shipped="YES"` with a `TrackingNumber`
/// contribute; its `carrier` and `href` attributes fill the companies and
/// URLs. Every other root child becomes a param.
#[must_use]
pub fn parse_tracking(body: &str, test_mode: bool, max_log_size: usize) -> Response<TrackingData> {
    with_document(body, max_log_size, |root| {
        let mut data = TrackingData::default();
        for order in root.children().filter(|n| n.has_tag_name("Order")) {
            if order.attribute("shipped") != Some("YES") {
                continue;
            }
            let Some(tracking) = xml::child(order, "TrackingNumber") else {
                continue;
            };
            let Some(id) = order.attribute("id").map(str::trim) else {
                continue;
            };
            let order_id = OrderId::new(id);

            data.tracking_numbers
                .insert(order_id.clone(), vec![xml::text(tracking)]);
            if let Some(carrier) = tracking.attribute("carrier") {
                data.tracking_companies
                    .insert(order_id.clone(), vec![carrier.trim().to_string()]);
            }
            if let Some(href) = tracking.attribute("href") {
                data.tracking_urls
                    .insert(order_id, vec![href.trim().to_string()]);
            }
        }

        let params = root_params(root);
        let success = is_success(params.get_str("status"), test_mode);
        respond(success, TRACKING_SUCCESS, params, data)
    })
}
