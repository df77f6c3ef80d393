//! Integration tests for the fulfillment provider adapters.
//!
//! Every scenario drives a real adapter through
//! [`ScriptedTransport`](fulfillment_providers::testing::ScriptedTransport),
//! so no network access or provider account is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fulfillment-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `mws_*` - Marketplace gateway: pagination, tracking, retry, classification, logging
//! - `webgistix` - XML warehouse flows
//! - `james_and_james` - JSON warehouse flows
//! - `shipwire` - Form-posted XML warehouse flows

pub mod fixtures;

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use fulfillment_core::{Address, FulfillmentOrderRequest, LineItem};
use fulfillment_providers::testing::ScriptedTransport;
use fulfillment_providers::{MwsService, ServiceConfig};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Log output captured from the current thread's subscriber.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything logged so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture `DEBUG` and above for the current thread until the guard drops.
///
/// `#[tokio::test]` runs on a single thread, so adapter logs land here.
#[must_use]
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

/// Decoded value of `key` in a form-encoded request body.
#[must_use]
pub fn form_value(body: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Marketplace credentials used across scenarios.
pub const MWS_LOGIN: &str = "AKIAEXAMPLELOGIN";
pub const MWS_SECRET: &str = "l0dobmFY7VBNVd2w1UsQzuhoPV0Tw0M1nJs4TkXp";
pub const MWS_SELLER_ID: &str = "A1EXAMPLESELLER";

#[must_use]
pub fn mws_config() -> ServiceConfig {
    ServiceConfig::new(MWS_LOGIN, MWS_SECRET).with_seller_id(MWS_SELLER_ID)
}

/// A marketplace adapter over a fresh scripted transport.
///
/// # Panics
///
/// Panics if `config` is rejected.
#[must_use]
pub fn mws_service(config: ServiceConfig) -> MwsService<ScriptedTransport> {
    MwsService::with_transport(config, ScriptedTransport::new()).expect("valid config")
}

/// A complete order that every adapter accepts.
#[must_use]
pub fn order() -> FulfillmentOrderRequest {
    let address = Address::new("Johnny Chase", "100 Information Super Highway", "Beverly Hills", "US", "90210")
        .with_state("CA")
        .with_phone("(555)555-5555")
        .with_email("johnny@example.com");

    FulfillmentOrderRequest::new(
        "12345678",
        address.clone(),
        vec![
            LineItem::new("SETTLERS1", 1).with_comment("Awesome"),
            LineItem::new("FOOBAR1", 2),
        ],
    )
    .with_order_date(chrono::Utc::now())
    .with_shipping_method("Standard")
    .with_comment("Delayed due to tornados")
    .with_billing_address(address)
}
