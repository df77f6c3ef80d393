//! Response classification.
//!
//! Responses are XML fragments without a single root, so each body is
//! wrapped in `<response>` before parsing. Any `Errors/Error` element fails
//! the call; its text is kept as `params.error_N`.

use fulfillment_core::{OrderId, Params, Response, Sku, StockLevels, TrackingData};
use roxmltree::Node;
use serde_json::Value;

use crate::logging::truncate;
use crate::transport::TransportError;
use crate::xml;

pub const SUCCESS: &str = "True";
pub const DUPLICATE: &str = "Duplicate";
pub const FAILURE: &str = "False";

pub const SUCCESS_MESSAGE: &str = "Successfully submitted the order";
pub const FAILURE_MESSAGE: &str = "Failed to submit the order";
pub const DUPLICATE_MESSAGE: &str = "This order has already been successfully submitted";
pub const INVALID_LOGIN: &str = "Invalid Credentials";

/// Tracking number placeholder for shipments that have not left the warehouse.
pub const NOT_SHIPPED: &str = "Not Shipped";

/// Carriers recognized from the first word of a shipment's `Method`.
pub const TRACKING_COMPANIES: [&str; 3] = ["UPS", "FedEx", "USPS"];

fn wrap(body: &str) -> String {
    let body = body.trim_start();
    let body = match body.strip_prefix("<?xml") {
        Some(rest) => rest.split_once("?>").map_or("", |(_, after)| after),
        None => body,
    };
    format!("<response>{body}</response>")
}

fn errors(root: Node<'_, '_>) -> Params {
    let mut params = Params::new();
    for (i, error) in xml::select(root, &["Errors", "Error"]).into_iter().enumerate() {
        params.insert(format!("error_{i}"), xml::text(error));
    }

    let status = if params.is_empty() { SUCCESS } else { FAILURE };
    params.insert("success", status);
    params
}

fn is_success(params: &Params) -> bool {
    matches!(params.get_str("success"), Some(SUCCESS | DUPLICATE))
}

fn message(params: &Params) -> &'static str {
    if params.get("duplicate") == Some(&Value::Bool(true)) {
        DUPLICATE_MESSAGE
    } else if is_success(params) {
        SUCCESS_MESSAGE
    } else if params.get_str("error_0") == Some(INVALID_LOGIN) {
        INVALID_LOGIN
    } else {
        FAILURE_MESSAGE
    }
}

fn respond<T>(params: Params, data: T) -> Response<T> {
    let message = message(&params).to_string();
    Response::new(is_success(&params), Some(message), params, data)
}

fn malformed<T: Default>(body: &str, max_log_size: usize) -> Response<T> {
    let mut params = Params::new();
    params.insert("success", FAILURE);
    params.insert("http_body", truncate(body, max_log_size).into_owned());
    respond(params, T::default())
}

/// Parse a wrapped body and hand the root to `on_document`.
fn with_document<T: Default>(
    body: &str,
    max_log_size: usize,
    on_document: impl FnOnce(Node<'_, '_>) -> Response<T>,
) -> Response<T> {
    let wrapped = wrap(body);
    match xml::parse(&wrapped) {
        Ok(document) => on_document(document.root_element()),
        Err(_) => malformed(body, max_log_size),
    }
}

/// Classify a transport failure.
#[must_use]
pub fn parse_error<T: Default>(error: &TransportError, max_log_size: usize) -> Response<T> {
    let mut params = error.diagnostic_params(max_log_size);
    params.insert("success", FAILURE);
    respond(params, T::default())
}

/// `CreateOrder` / `CreateOrderTest`.
///
/// The children of `Completed` become params; without one the order
/// failed. A `Success` of `Duplicate` counts as success and sets
/// `params.duplicate`.
#[must_use]
pub fn parse_fulfillment(body: &str, max_log_size: usize) -> Response {
    with_document(body, max_log_size, |root| {
        let mut params = errors(root);

        match xml::find(root, "Completed") {
            Some(completed) => {
                for element in completed.children().filter(Node::is_element) {
                    params.insert(element.tag_name().name(), xml::text(element));
                }
            }
            None => params.insert("success", FAILURE),
        }

        let duplicate = params.get_str("success") == Some(DUPLICATE);
        params.insert("duplicate", duplicate);
        respond(params, ())
    })
}

/// `GetInventory`. Quantities that are not integers count as zero.
#[must_use]
pub fn parse_inventory(body: &str, max_log_size: usize) -> Response<StockLevels> {
    with_document(body, max_log_size, |root| {
        let mut levels = StockLevels::new();
        for item in xml::find_all(root, "Item") {
            let Some(sku) = xml::text_of(item, "ItemID") else {
                continue;
            };
            let quantity = xml::text_of(item, "ItemQty")
                .and_then(|q| q.parse().ok())
                .unwrap_or(0);
            levels.insert(Sku::new(sku), quantity);
        }

        respond(errors(root), levels)
    })
}

/// `GetTracking`. Shipments are keyed by `InvoiceNumber`.
#[must_use]
pub fn parse_tracking(body: &str, max_log_size: usize) -> Response<TrackingData> {
    with_document(body, max_log_size, |root| {
        let mut data = TrackingData::default();
        for shipment in xml::find_all(root, "Shipment") {
            let Some(invoice) = xml::text_of(shipment, "InvoiceNumber") else {
                continue;
            };
            let order_id = OrderId::new(invoice);

            if let Some(number) =
                xml::text_of(shipment, "ShipmentTrackingNumber").filter(|n| n != NOT_SHIPPED)
            {
                data.tracking_numbers
                    .entry(order_id.clone())
                    .or_default()
                    .push(number);
            }

            let company = xml::text_of(shipment, "Method")
                .and_then(|method| method.split_whitespace().next().map(str::to_string))
                .filter(|company| TRACKING_COMPANIES.contains(&company.as_str()));
            if let Some(company) = company {
                data.tracking_companies.entry(order_id).or_default().push(company);
            }
        }

        respond(errors(root), data)
    })
}
