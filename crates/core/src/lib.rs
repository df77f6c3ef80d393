//! Fulfillment Core - shared types for fulfillment provider adapters.
//!
//! This crate defines the vocabulary every adapter in
//! `fulfillment-providers` speaks: order requests, stock and tracking
//! queries, the normalized [`Response`] value, and the [`Service`] trait.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP
//! clients, no XML. Adapters depend on it; it depends on nothing of theirs.
//!
//! # Modules
//!
//! - [`types`] - Addresses, orders, queries, responses and identifiers
//! - [`error`] - Caller errors raised before a request is sent
//! - [`service`] - The provider capability trait

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod service;
pub mod types;

pub use error::RequestError;
pub use service::Service;
pub use types::*;
