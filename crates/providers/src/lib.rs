//! Fulfillment Providers - adapters for third-party fulfillment warehouses.
//!
//! Each adapter implements [`fulfillment_core::Service`] over its provider's
//! wire protocol and folds every remote outcome into a
//! [`fulfillment_core::Response`].
//!
//! # Adapters
//!
//! - [`mws`] - Marketplace fulfillment gateway: HMAC-signed form posts, XML
//!   replies, paginated inventory and per-order tracking
//! - [`webgistix`] - XML documents posted to per-operation endpoints
//! - [`james_and_james`] - JSON over HTTPS on a per-account subdomain
//! - [`shipwire`] - Form-posted XML documents; tracking replies carry URLs
//!
//! # Plumbing
//!
//! - [`config`] - Credentials and options, loadable from the environment
//! - [`transport`] - The [`Transport`] seam and its reqwest implementation
//! - [`retry`] - Bounded retry on `503 Service Unavailable`
//! - [`xml`] - Tolerant XML lookups shared by the XML adapters
//! - [`logging`] - Credential redaction and body truncation for logs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod james_and_james;
pub mod logging;
pub mod mws;
pub mod retry;
pub mod shipwire;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod webgistix;
pub mod xml;

pub use config::{ConfigError, Region, ServiceConfig};
pub use james_and_james::JamesAndJamesService;
pub use mws::MwsService;
pub use retry::RetryPolicy;
pub use shipwire::{ShipwireOptions, ShipwireService};
pub use transport::{HttpTransport, Method, Transport, TransportError, WireRequest};
pub use webgistix::WebgistixService;
