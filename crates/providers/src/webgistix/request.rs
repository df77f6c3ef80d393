//! Request documents.
//!
//! Every request is a small XML document whose root names the operation
//! (`OrderXML`, `InventoryXML`, `TrackingXML`) and whose first two children
//! carry the account credentials.

use fulfillment_core::{Address, FulfillmentOrderRequest, LineItem, OrderId, Sku, non_blank};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use secrecy::ExposeSecret;

use crate::config::ServiceConfig;

/// Orders are submitted pre-approved.
const APPROVE: &str = "1";

struct XmlBody {
    writer: Writer<Vec<u8>>,
}

impl XmlBody {
    fn new(root: &str, config: &ServiceConfig) -> Self {
        let mut body = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        body.write(Event::Decl(BytesDecl::new("1.0", None, None)));
        body.open(root);
        body.element("CustomerID", config.login());
        body.element("Password", config.secret_key().expose_secret());
        body
    }

    fn write(&mut self, event: Event<'_>) {
        // Writing into a Vec cannot fail.
        let _ = self.writer.write_event(event);
    }

    fn open(&mut self, name: &str) {
        self.write(Event::Start(BytesStart::new(name)));
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

    fn finish(mut self, root: &str) -> String {
        self.close(root);
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }
}

/// `OrderXML` for `CreateOrder.asp`.
pub fn fulfillment_xml(
    config: &ServiceConfig,
    order: &FulfillmentOrderRequest,
    shipping_method: &str,
) -> String {
    let mut xml = XmlBody::new("OrderXML", config);

    xml.open("Order");
    xml.element("ReferenceNumber", order.order_id.as_str());
    xml.element("ShippingInstructions", shipping_method);
    xml.element("Approve", APPROVE);
    xml.optional("OrderComments", order.comment());

    add_address(&mut xml, &order.shipping_address);

    for item in &order.line_items {
        add_item(&mut xml, item);
    }
    xml.close("Order");

    xml.finish("OrderXML")
}

fn add_address(xml: &mut XmlBody, address: &Address) {
    xml.element("Name", &address.name);
    xml.element("Address1", &address.address1);
    xml.optional("Address2", address.address2.as_deref());
    xml.optional("Address3", address.address3.as_deref());
    xml.element("City", &address.city);
    xml.element("State", address.state.as_deref().unwrap_or_default());
    xml.element("ZipCode", &address.zip);
    xml.element("Company", address.company.as_deref().unwrap_or_default());
    xml.optional("Country", Some(address.country.as_str()));
    xml.element("Phone", address.phone.as_deref().unwrap_or_default());
    xml.optional("Email", address.email.as_deref());
}

fn add_item(xml: &mut XmlBody, item: &LineItem) {
    xml.open("Item");
    xml.optional("ItemID", item.sku.as_ref().map(Sku::as_str));
    if let Some(quantity) = item.quantity {
        xml.element("ItemQty", &quantity.to_string());
    }
    xml.close("Item");
}

/// `InventoryXML` for `GetInventory.asp`. Always lists every item.
pub fn inventory_xml(config: &ServiceConfig) -> String {
    XmlBody::new("InventoryXML", config).finish("InventoryXML")
}

/// `TrackingXML` for `GetTracking.asp`, one `Tracking` entry per order.
pub fn tracking_xml(config: &ServiceConfig, order_ids: &[OrderId]) -> String {
    let mut xml = XmlBody::new("TrackingXML", config);
    for order_id in order_ids {
        xml.open("Tracking");
        xml.element("Order", order_id.as_str());
        xml.close("Tracking");
    }
    xml.finish("TrackingXML")
}
