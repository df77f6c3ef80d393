//! Request documents.
//!
//! Every document declares its DTD, opens with the account credentials and
//! is form-posted under the variable its endpoint expects
//! (`OrderListXML`, `InventoryUpdateXML`, `TrackingUpdateXML`).

use fulfillment_core::{Address, FulfillmentOrderRequest, LineItem, OrderId, Sku, non_blank};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use secrecy::ExposeSecret;

use super::{ShipwireOptions, shipping_code, warehouse_name};
use crate::config::ServiceConfig;

pub const ORDER_LIST_SCHEMA: &str = "http://www.shipwire.com/exec/download/OrderList.dtd";
pub const INVENTORY_SCHEMA: &str = "http://www.shipwire.com/exec/download/InventoryUpdate.dtd";
pub const TRACKING_SCHEMA: &str = "http://www.shipwire.com/exec/download/TrackingUpdate.dtd";

/// Identifies the integration to the warehouse.
const REFERER: &str = "Active Fulfillment";

/// Warehouse code meaning "let the warehouse choose".
pub const ANY_WAREHOUSE: &str = "00";

struct XmlBody {
    writer: Writer<Vec<u8>>,
}

impl XmlBody {
    fn new(root: &str, schema: &str, config: &ServiceConfig, options: &ShipwireOptions) -> Self {
        let mut body = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        body.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
        body.write(Event::DocType(BytesText::from_escaped(format!(
            "{root} SYSTEM \"{schema}\""
        ))));
        body.open(root);
        body.element("EmailAddress", config.login());
        body.element("Password", config.secret_key().expose_secret());
        body.element("Server", server(config));
        body.optional("AffiliateId", options.affiliate_id.as_deref());
        body
    }

    fn write(&mut self, event: Event<'_>) {
        // Writing into a Vec cannot fail.
        let _ = self.writer.write_event(event);
    }

    fn open(&mut self, name: &str) {
        self.write(Event::Start(BytesStart::new(name)));
    }

    fn open_with(&mut self, name: &str, attribute: (&str, &str)) {
        self.write(Event::Start(BytesStart::new(name).with_attributes([attribute])));
    }

    fn close(&mut self, name: &str) {
        self.write(Event::End(BytesEnd::new(name)));
    }

    fn element(&mut self, name: &str, text: &str) {
        self.open(name);
        self.write(Event::Text(BytesText::new(text)));
        self.close(name);
    }

    fn optional(&mut self, name: &str, text: Option<&str>) {
        if let Some(text) = non_blank(text) {
            self.element(name, text);
        }
    }

    fn empty(&mut self, name: &str) {
        self.write(Event::Empty(BytesStart::new(name)));
    }

    fn finish(mut self, root: &str) -> String {
        self.close(root);
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }
}

const fn server(config: &ServiceConfig) -> &'static str {
    if config.test_mode() { "Test" } else { "Production" }
}

/// `OrderList` for `FulfillmentServices.php`.
pub fn fulfillment_xml(
    config: &ServiceConfig,
    options: &ShipwireOptions,
    order: &FulfillmentOrderRequest,
) -> String {
    let mut xml = XmlBody::new("OrderList", ORDER_LIST_SCHEMA, config, options);
    xml.element("Referer", REFERER);

    xml.open_with("Order", ("id", order.order_id.as_str()));
    xml.element(
        "Warehouse",
        non_blank(options.warehouse.as_deref()).unwrap_or(ANY_WAREHOUSE),
    );

    add_address(&mut xml, &order.shipping_address);
    if let Some(method) = non_blank(order.shipping_method.as_deref()) {
        xml.element("Shipping", shipping_code(method));
    }

    for (index, item) in order.line_items.iter().enumerate() {
        add_item(&mut xml, item, index);
    }

    xml.open("Note");
    if let Some(note) = order.comment() {
        if note.contains("]]>") {
            xml.write(Event::Text(BytesText::new(note)));
        } else {
            xml.write(Event::CData(BytesCData::new(note)));
        }
    }
    xml.close("Note");
    xml.close("Order");

    xml.finish("OrderList")
}

fn add_address(xml: &mut XmlBody, address: &Address) {
    xml.open_with("AddressInfo", ("type", "Ship"));
    xml.open("Name");
    xml.element("Full", &address.name);
    xml.close("Name");
    xml.element("Address1", &address.address1);
    xml.element("Address2", address.address2.as_deref().unwrap_or_default());
    xml.element("Company", address.company.as_deref().unwrap_or_default());
    xml.element("City", &address.city);
    xml.optional("State", address.state.as_deref());
    xml.element("Country", &address.country);
    xml.element("Zip", &address.zip);
    xml.optional("Phone", address.phone.as_deref());
    xml.optional("Email", address.email.as_deref());
    xml.close("AddressInfo");
}

// Codes longer than 12 characters are rejected by the warehouse.
fn add_item(xml: &mut XmlBody, item: &LineItem, index: usize) {
    xml.open_with("Item", ("num", index.to_string().as_str()));
    xml.element("Code", item.sku.as_ref().map_or("", Sku::as_str));
    xml.element("Quantity", &item.quantity_or_default().to_string());
    xml.close("Item");
}

/// `InventoryUpdate` for `InventoryServices.php`.
///
/// `sku` narrows the report to one product; `None` lists everything.
pub fn inventory_xml(config: &ServiceConfig, options: &ShipwireOptions, sku: Option<&Sku>) -> String {
    let mut xml = XmlBody::new("InventoryUpdate", INVENTORY_SCHEMA, config, options);
    xml.element(
        "Warehouse",
        options.warehouse.as_deref().and_then(warehouse_name).unwrap_or_default(),
    );
    xml.element("ProductCode", sku.map_or("", Sku::as_str));
    if options.include_empty_stock {
        xml.empty("IncludeEmpty");
    }
    xml.finish("InventoryUpdate")
}

/// `TrackingUpdate` for `TrackingServices.php`, one `OrderNo` per order.
pub fn tracking_xml(config: &ServiceConfig, options: &ShipwireOptions, order_ids: &[OrderId]) -> String {
    let mut xml = XmlBody::new("TrackingUpdate", TRACKING_SCHEMA, config, options);
    for order_id in order_ids {
        xml.element("OrderNo", order_id.as_str());
    }
    xml.finish("TrackingUpdate")
}

/// Form body carrying `document` under `variable`.
pub fn form_body(variable: &str, document: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(variable, document)
        .finish()
}
