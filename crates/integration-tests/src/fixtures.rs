//! Recorded provider replies.

/// First inventory page; carries a `NextToken`.
pub const INVENTORY_PAGE_1: &str = r#"<?xml version="1.0"?>
<ListInventorySupplyResponse xmlns="http://mws.amazonaws.com/FulfillmentInventory/2010-10-01/">
  <ListInventorySupplyResult>
    <InventorySupplyList>
      <member>
        <SellerSKU>GN-00-01A</SellerSKU>
        <ASIN>B002LBSX2U</ASIN>
        <TotalSupplyQuantity>202</TotalSupplyQuantity>
        <FNSKU>X0000000NA</FNSKU>
        <Condition>NewItem</Condition>
        <InStockSupplyQuantity>202</InStockSupplyQuantity>
      </member>
      <member>
        <SellerSKU>GN-00-02A</SellerSKU>
        <ASIN>B002LBSX2V</ASIN>
        <TotalSupplyQuantity>199</TotalSupplyQuantity>
        <FNSKU>X0000000NB</FNSKU>
        <Condition>NewItem</Condition>
        <InStockSupplyQuantity>199</InStockSupplyQuantity>
      </member>
    </InventorySupplyList>
    <NextToken>AAAAAAAAAABY18xVyENXGoVUIXmU0pW9IZ/QV6XyNaVmCX8lpWuqHRoUyGiNSlHdjdvNq3BNEDvmhtCrB3tsmb3+WeiI3NkCuw==</NextToken>
  </ListInventorySupplyResult>
  <ResponseMetadata>
    <RequestId>e8698ffa-8e59-11df-9acb-230ae7a8b736</RequestId>
  </ResponseMetadata>
</ListInventorySupplyResponse>"#;

/// Final inventory page.
pub const INVENTORY_PAGE_2: &str = r#"<?xml version="1.0"?>
<ListInventorySupplyByNextTokenResponse xmlns="http://mws.amazonaws.com/FulfillmentInventory/2010-10-01/">
  <ListInventorySupplyByNextTokenResult>
    <InventorySupplyList>
      <member>
        <SellerSKU>GN-01-01A</SellerSKU>
        <ASIN>B002LBSX3A</ASIN>
        <TotalSupplyQuantity>0</TotalSupplyQuantity>
        <Condition>NewItem</Condition>
        <InStockSupplyQuantity>0</InStockSupplyQuantity>
      </member>
      <member>
        <SellerSKU>GN-01-02A</SellerSKU>
        <ASIN>B002LBSX3B</ASIN>
        <TotalSupplyQuantity>5259</TotalSupplyQuantity>
        <Condition>NewItem</Condition>
        <InStockSupplyQuantity>5259</InStockSupplyQuantity>
      </member>
    </InventorySupplyList>
    <NextToken/>
  </ListInventorySupplyByNextTokenResult>
  <ResponseMetadata>
    <RequestId>f8698ffa-8e59-11df-9acb-230ae7a8b736</RequestId>
  </ResponseMetadata>
</ListInventorySupplyByNextTokenResponse>"#;

/// A single inventory page listing `(sku, quantity)` pairs.
#[must_use]
pub fn inventory_page(items: &[(&str, i64)], next_token: Option<&str>) -> String {
    let members: String = items
        .iter()
        .map(|(sku, quantity)| {
            format!(
                "<member><SellerSKU>{sku}</SellerSKU><InStockSupplyQuantity>{quantity}</InStockSupplyQuantity></member>"
            )
        })
        .collect();
    let token = next_token.map_or_else(String::new, |t| format!("<NextToken>{t}</NextToken>"));

    format!(
        "<ListInventorySupplyResponse><ListInventorySupplyResult>\
         <InventorySupplyList>{members}</InventorySupplyList>{token}\
         </ListInventorySupplyResult></ListInventorySupplyResponse>"
    )
}

/// `GetFulfillmentOrder` for an order with one shipped package.
#[must_use]
pub fn tracking_response(order_id: &str, tracking_number: &str, carrier: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<GetFulfillmentOrderResponse xmlns="http://mws.amazonaws.com/FulfillmentOutboundShipment/2010-10-01/">
  <GetFulfillmentOrderResult>
    <FulfillmentOrder>
      <SellerFulfillmentOrderId>{order_id}</SellerFulfillmentOrderId>
      <FulfillmentOrderStatus>COMPLETE</FulfillmentOrderStatus>
    </FulfillmentOrder>
    <FulfillmentShipment>
      <member>
        <FulfillmentShipmentStatus>SHIPPED</FulfillmentShipmentStatus>
        <FulfillmentShipmentPackage>
          <member>
            <PackageNumber>1</PackageNumber>
            <TrackingNumber>{tracking_number}</TrackingNumber>
            <CarrierCode>{carrier}</CarrierCode>
          </member>
        </FulfillmentShipmentPackage>
      </member>
    </FulfillmentShipment>
  </GetFulfillmentOrderResult>
</GetFulfillmentOrderResponse>"#
    )
}

/// A provider fault with the given message.
#[must_use]
pub fn fault(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<ErrorResponse xmlns="http://mws.amazonaws.com/FulfillmentOutboundShipment/2010-10-01/">
  <Error>
    <Type>Sender</Type>
    <Code>{code}</Code>
    <Message>{message}</Message>
  </Error>
  <RequestId>e71f72f6-5b5c-4a1e-9a0b-1d3c9f3d8f7c</RequestId>
</ErrorResponse>"#
    )
}

/// The fault returned for an order id the provider does not know.
#[must_use]
pub fn order_not_found(order_id: &str) -> String {
    fault(
        "InvalidParameterValue",
        &format!("Requested order '{order_id}' not found"),
    )
}

/// `CreateFulfillmentOrder` success.
pub const FULFILLMENT_ACCEPTED: &str = r#"<?xml version="1.0"?>
<CreateFulfillmentOrderResponse xmlns="http://mws.amazonaws.com/FulfillmentOutboundShipment/2010-10-01/">
  <ResponseMetadata>
    <RequestId>d95be26c-16cf-4ff5-bd1a-38a8e5b2f2e1</RequestId>
  </ResponseMetadata>
</CreateFulfillmentOrderResponse>"#;

/// An HTML error page served instead of XML.
pub const NOT_FOUND_PAGE: &str = "<html><head><title>404 Not Found</title></head>\
<body><h1>Not Found</h1></body></html>";

/// Webgistix replies.
pub mod webgistix {
    pub const SUCCESS: &str = "<Completed><Success>True</Success><OrderID>619669</OrderID></Completed>";
    pub const DUPLICATE: &str = "<Completed><Success>Duplicate</Success></Completed>";
    pub const INVALID_LOGIN: &str = "<Errors><Error>Invalid Credentials</Error></Errors>";
    pub const INVENTORY: &str = "<InventoryXML>\
        <Item><ItemID>GN-00-01A</ItemID><ItemQty>202</ItemQty></Item>\
        <Item><ItemID>GN-00-02A</ItemID><ItemQty>199</ItemQty></Item>\
        </InventoryXML>";
    pub const TRACKING: &str = "<TrackingXML>\
        <Tracking><Order>AB12345</Order><Shipment><InvoiceNumber>AB12345</InvoiceNumber>\
        <Warehouse>Webgistix</Warehouse><Method>UPS Ground</Method>\
        <ShipmentTrackingNumber>1Z8E5A380396682872</ShipmentTrackingNumber></Shipment></Tracking>\
        <Tracking><Order>XY4567</Order><Shipment><InvoiceNumber>XY4567</InvoiceNumber>\
        <Warehouse>Webgistix</Warehouse><Method>UPS Ground</Method>\
        <ShipmentTrackingNumber>Not Shipped</ShipmentTrackingNumber></Shipment></Tracking>\
        </TrackingXML>";
}

/// James & James replies.
pub mod james_and_james {
    pub const SUCCESS: &str = r#"{"success": true, "valid": true, "test": true}"#;
    pub const FAILURE: &str = r#"{"success": false, "test": true}"#;
    pub const INVENTORY: &str = r#"{"success": true, "stock": {"AAA": 99, "BBB": 9}, "test": true}"#;
}

/// Shipwire replies.
pub mod shipwire {
    pub const SUBMITTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SubmitOrderResponse>
  <Status>0</Status>
  <TotalOrders>1</TotalOrders>
  <TotalItems>1</TotalItems>
  <TransactionId>1234567890-2345678-1</TransactionId>
</SubmitOrderResponse>"#;

    pub const REJECTED_LOGIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SubmitOrderResponse>
  <Status>Error</Status>
  <ErrorMessage><![CDATA[
    Could not verify Username/EmailAddress and Password combination
  ]]></ErrorMessage>
</SubmitOrderResponse>"#;

    pub const INVENTORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<InventoryUpdateResponse>
  <Status>0</Status>
  <Product code="BlackDog" quantity="926" good="926" pending="0" backordered="0"/>
  <Product code="MoustacheCat" quantity="-1" good="0" pending="806" backordered="1"/>
  <Product code="KingMonkey" quantity="677" good="677" pending="244" backordered="0"/>
  <TotalProducts>3</TotalProducts>
</InventoryUpdateResponse>"#;

    pub const INVENTORY_INVALID_LOGIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<InventoryUpdateResponse>
  <Status>Error</Status>
  <ErrorMessage>Error with Valid Username/EmailAddress and Password Required. There is an error in XML document.</ErrorMessage>
</InventoryUpdateResponse>"#;

    pub const TRACKING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackingUpdateResponse>
  <Status>Test</Status>
  <Order id="2986" shipped="YES" shipper="UPS GD" handling="1.00" shipping="13.66" total="14.66">
    <TrackingNumber carrier="UPS" href="http://wwwapps.ups.com/WebTracking/processInputRequest?TypeOfInquiryNumber=T&amp;InquiryNumber1=1ZW682E90326614239">1ZW682E90326614239</TrackingNumber>
  </Order>
  <Order id="2987" shipped="YES" shipper="UPS GD" handling="1.00" shipping="9.42" total="10.42">
    <TrackingNumber carrier="UPS" href="http://wwwapps.ups.com/WebTracking/processInputRequest?TypeOfInquiryNumber=T&amp;InquiryNumber1=1ZW682E90326795080">1ZW682E90326795080</TrackingNumber>
  </Order>
  <Order id="2988" shipped="NO" shipper="" handling="" shipping="" total=""/>
  <TotalOrders>3</TotalOrders>
  <TotalShippedOrders>2</TotalShippedOrders>
  <Bookmark>2009-11-30 18:19:29</Bookmark>
</TrackingUpdateResponse>"#;

    pub const TRACKING_WITH_URLS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackingUpdateResponse>
  <Status>Test</Status>
  <Order id="40298" shipped="YES" shipper="USPS FCI" handling="0.00" shipping="2.85" total="2.85">
    <TrackingNumber carrier="USPS" href="http://trkcnfrm1.smi.usps.com/PTSInternetWeb/InterLabelInquiry.do?origTrackNum=9400110200793596422990">9400110200793596422990</TrackingNumber>
  </Order>
  <TotalOrders>1</TotalOrders>
  <TotalShippedOrders>1</TotalShippedOrders>
</TrackingUpdateResponse>"#;

    pub const EMPTY_TRACKING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackingUpdateResponse>
  <Status>Test</Status>
  <TotalOrders>0</TotalOrders>
  <TotalShippedOrders>0</TotalShippedOrders>
</TrackingUpdateResponse>"#;
}
