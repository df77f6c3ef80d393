//! Response parsing and classification.
//!
//! Every body, whether from a 2xx response or carried by a
//! [`TransportError`], ends up as a [`Response`]. Nothing here returns an
//! error or panics on bad input.

use fulfillment_core::{OrderId, Params, Response, StockLevels, TrackingData};
use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::logging::truncate;
use crate::transport::TransportError;
use crate::xml;

/// `response_status` of a successful call.
pub const SUCCESS: &str = "Accepted";

/// `response_status` of a failed call.
pub const FAILURE: &str = "Failure";

/// Message of a successful `CreateFulfillmentOrder`.
pub const FULFILLMENT_SUCCESS_MESSAGE: &str = "Successfully submitted the order";

/// The kind of call a body answers. Selects the expected result element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fulfill,
    Inventory,
    Tracking,
    ServiceStatus,
    ListOrders,
}

impl Operation {
    /// Root elements that mark a successful answer.
    #[must_use]
    pub const fn result_elements(self) -> &'static [&'static str] {
        match self {
            Self::Fulfill => &["CreateFulfillmentOrderResponse"],
            Self::Inventory => &[
                "ListInventorySupplyResponse",
                "ListInventorySupplyByNextTokenResponse",
            ],
            Self::Tracking => &["GetFulfillmentOrderResponse"],
            Self::ServiceStatus => &["GetServiceStatusResponse"],
            Self::ListOrders => &["ListAllFulfillmentOrdersResponse"],
        }
    }
}

/// One page of an inventory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryPage {
    pub response: Response<StockLevels>,
    pub next_token: Option<String>,
}

/// Summary of an order returned by `ListAllFulfillmentOrders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentOrderSummary {
    pub seller_fulfillment_order_id: OrderId,
    pub displayable_order_id: Option<String>,
    pub status: Option<String>,
    pub received_date: Option<String>,
}

/// A provider-reported error.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fault {
    code: String,
    message: String,
}

impl Fault {
    fn find(root: Node<'_, '_>) -> Option<Self> {
        let error = xml::find(root, "Error")?;
        Some(Self {
            code: xml::text_of(error, "Code").unwrap_or_default(),
            message: xml::text_of(error, "Message").unwrap_or_default(),
        })
    }

    fn comment(&self) -> String {
        format!("{}: {}", self.code, self.message)
    }

    fn into_response<T: Default>(self, mut params: Params) -> Response<T> {
        let comment = self.comment();
        params.insert("status", FAILURE);
        params.insert("response_status", FAILURE);
        params.insert("faultcode", self.code);
        params.insert("faultstring", self.message.clone());
        params.insert("response_message", self.message);
        params.insert("response_comment", comment.clone());
        Response::failed(comment, params)
    }
}

/// Whether a failed response is the "requested order not found" fault.
#[must_use]
pub fn is_order_not_found<T>(response: &Response<T>) -> bool {
    if response.is_success() {
        return false;
    }

    response
        .get("faultstring")
        .and_then(|s| s.strip_prefix("Requested order '"))
        .and_then(|s| s.strip_suffix("' not found"))
        .is_some_and(|id| !id.is_empty())
}

/// Parse a 2xx body, then hand the result element to `on_success`.
fn classify<T: Default>(
    body: &str,
    operation: Operation,
    max_log_size: usize,
    on_success: impl FnOnce(Node<'_, '_>) -> Response<T>,
) -> Response<T> {
    let document = match xml::parse(body) {
        Ok(document) => document,
        Err(e) => return unreadable(&e.to_string(), body, max_log_size),
    };
    let root = document.root_element();

    if let Some(fault) = Fault::find(root) {
        return fault.into_response(Params::new());
    }

    if !operation.result_elements().contains(&root.tag_name().name()) {
        let comment = format!("Unexpected response element: {}", root.tag_name().name());
        return unreadable(&comment, body, max_log_size);
    }

    on_success(root)
}

fn unreadable<T: Default>(comment: &str, body: &str, max_log_size: usize) -> Response<T> {
    let mut params = Params::new();
    params.insert("response_status", FAILURE);
    params.insert("response_comment", comment);
    params.insert("http_body", truncate(body, max_log_size).into_owned());
    Response::failed(comment, params)
}

fn accepted() -> Params {
    let mut params = Params::new();
    params.insert("response_status", SUCCESS);
    params
}

/// Classify a transport failure.
///
/// A body carrying an `Error` element yields `"<Code>: <Message>"`.
/// Anything else falls back to `"<status>: <reason>"` with the body kept
/// (truncated) in `http_body`.
#[must_use]
pub fn parse_error<T: Default>(error: &TransportError, max_log_size: usize) -> Response<T> {
    let (status, reason, body) = match error {
        TransportError::Status { status, reason, body } => (*status, reason, body),
        TransportError::Connection(message) => {
            let mut params = Params::new();
            params.insert("response_status", FAILURE);
            params.insert("response_comment", message.as_str());
            return Response::failed(error.to_string(), params);
        }
    };

    let mut params = Params::new();
    params.insert("http_code", status.to_string());
    params.insert("http_message", reason.as_str());

    let fault = xml::parse(body)
        .ok()
        .and_then(|document| Fault::find(document.root_element()));

    if let Some(fault) = fault {
        return fault.into_response(params);
    }

    let comment = format!("{status}: {reason}");
    params.insert("http_body", truncate(body, max_log_size).into_owned());
    params.insert("response_status", FAILURE);
    params.insert("response_comment", comment.clone());
    Response::failed(comment, params)
}

/// `CreateFulfillmentOrder`.
#[must_use]
pub fn parse_fulfillment(body: &str, max_log_size: usize) -> Response {
    classify(body, Operation::Fulfill, max_log_size, |_| {
        let mut params = accepted();
        params.insert("response_comment", FULFILLMENT_SUCCESS_MESSAGE);
        Response::succeeded(FULFILLMENT_SUCCESS_MESSAGE, params)
    })
}

/// One page of `ListInventorySupply` or `ListInventorySupplyByNextToken`.
#[must_use]
pub fn parse_inventory(body: &str, max_log_size: usize) -> InventoryPage {
    let mut next_token = None;

    let response = classify(body, Operation::Inventory, max_log_size, |root| {
        let mut levels = StockLevels::new();
        for member in xml::select(root, &["InventorySupplyList", "member"]) {
            let Some(sku) = xml::text_of(member, "SellerSKU").filter(|s| !s.is_empty()) else {
                continue;
            };
            let quantity = xml::text_of(member, "InStockSupplyQuantity")
                .and_then(|q| q.parse::<i64>().ok())
                .unwrap_or(0);
            levels.insert(sku.into(), quantity);
        }

        next_token = xml::text_of(root, "NextToken").filter(|t| !t.is_empty());
        Response::new(true, None, accepted(), levels)
    });

    InventoryPage {
        response,
        next_token,
    }
}

/// `GetFulfillmentOrder`. The order id in the body wins over `requested`.
#[must_use]
pub fn parse_tracking(body: &str, requested: &OrderId, max_log_size: usize) -> Response<TrackingData> {
    classify(body, Operation::Tracking, max_log_size, |root| {
        let order_id = xml::select(root, &["FulfillmentOrder", "SellerFulfillmentOrderId"])
            .first()
            .map(|node| xml::text(*node))
            .filter(|id| !id.is_empty())
            .map_or_else(|| requested.clone(), OrderId::from);

        let collect = |field: &str| -> Vec<String> {
            xml::select(root, &["FulfillmentShipmentPackage", "member", field])
                .into_iter()
                .map(xml::text)
                .collect()
        };

        let mut data = TrackingData::default();
        let numbers = collect("TrackingNumber");
        if !numbers.is_empty() {
            data.tracking_numbers.insert(order_id.clone(), numbers);
        }
        let carriers = collect("CarrierCode");
        if !carriers.is_empty() {
            data.tracking_companies.insert(order_id, carriers);
        }

        Response::new(true, None, accepted(), data)
    })
}

/// An empty tracking success, used in place of an "order not found" fault.
#[must_use]
pub fn empty_tracking() -> Response<TrackingData> {
    let mut params = accepted();
    params.insert("status", SUCCESS);
    Response::new(true, None, params, TrackingData::default())
}

/// `GetServiceStatus`.
#[must_use]
pub fn parse_service_status(body: &str, max_log_size: usize) -> Response {
    classify(body, Operation::ServiceStatus, max_log_size, |root| {
        let mut params = accepted();
        let status = xml::text_of(root, "Status").unwrap_or_default();
        params.insert("status", status.as_str());

        if let Some(timestamp) = xml::text_of(root, "Timestamp") {
            params.insert("timestamp", timestamp);
        }

        let messages: Vec<String> = xml::select(root, &["Messages", "Message", "Text"])
            .into_iter()
            .map(xml::text)
            .filter(|m| !m.is_empty())
            .collect();
        if !messages.is_empty() {
            params.insert("messages", messages.join("; "));
        }

        Response::new(true, Some(status), params, ())
    })
}

/// `ListAllFulfillmentOrders`.
#[must_use]
pub fn parse_order_list(body: &str, max_log_size: usize) -> Response<Vec<FulfillmentOrderSummary>> {
    classify(body, Operation::ListOrders, max_log_size, |root| {
        let orders = xml::select(root, &["FulfillmentOrders", "member"])
            .into_iter()
            .filter_map(|member| {
                let id = xml::text_of(member, "SellerFulfillmentOrderId").filter(|id| !id.is_empty())?;
                Some(FulfillmentOrderSummary {
                    seller_fulfillment_order_id: id.into(),
                    displayable_order_id: xml::text_of(member, "DisplayableOrderId"),
                    status: xml::text_of(member, "FulfillmentOrderStatus"),
                    received_date: xml::text_of(member, "ReceivedDateTime"),
                })
            })
            .collect();

        Response::new(true, None, accepted(), orders)
    })
}
