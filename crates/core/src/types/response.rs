//! The normalized result of every provider operation.
//!
//! Providers report success and failure in very different shapes. Adapters
//! fold all of them into a [`Response`]: a success flag, a human-readable
//! message, and a bag of diagnostic [`Params`] with snake_case keys. Typed
//! payloads (stock levels, tracking numbers) ride along in `data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{OrderId, Sku};

/// Quantity on hand per SKU.
pub type StockLevels = BTreeMap<Sku, i64>;

/// Convert a provider key such as `SellerSKU` or `HTTPCode` to snake_case.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut chars = key.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c.is_ascii_uppercase() {
            if let Some(p) = prev {
                let next_is_lower = chars.peek().is_some_and(char::is_ascii_lowercase);
                if p.is_ascii_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_ascii_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Diagnostic key/value pairs attached to a [`Response`].
///
/// Keys are normalized with [`normalize_key`] on insert and on lookup, so
/// `params.get("FaultCode")` and `params.get("fault_code")` agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<Value>) {
        self.0.insert(normalize_key(key.as_ref()), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&normalize_key(key))
    }

    /// Look up a string value. Non-string values yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&normalize_key(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Tracking details per order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingData {
    pub tracking_numbers: BTreeMap<OrderId, Vec<String>>,
    pub tracking_companies: BTreeMap<OrderId, Vec<String>>,
    pub tracking_urls: BTreeMap<OrderId, Vec<String>>,
}

impl TrackingData {
    /// Fold `other` into `self`. Keys present in both take `other`'s value.
    pub fn merge(&mut self, other: Self) {
        self.tracking_numbers.extend(other.tracking_numbers);
        self.tracking_companies.extend(other.tracking_companies);
        self.tracking_urls.extend(other.tracking_urls);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracking_numbers.is_empty()
            && self.tracking_companies.is_empty()
            && self.tracking_urls.is_empty()
    }
}

/// Outcome of a provider operation.
///
/// `T` is the typed payload: `()` for order submission, [`StockLevels`] for
/// inventory and [`TrackingData`] for tracking lookups. A failed response
/// carries an empty payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T = ()> {
    success: bool,
    message: Option<String>,
    params: Params,
    test: bool,
    data: T,
}

impl<T> Response<T> {
    #[must_use]
    pub fn new(success: bool, message: Option<String>, params: Params, data: T) -> Self {
        Self {
            success,
            message,
            params,
            test: false,
            data,
        }
    }

    /// Mark whether the response came from a provider test environment.
    #[must_use]
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Look up a string diagnostic parameter. Unknown keys yield `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get_str(key)
    }

    #[must_use]
    pub const fn is_test(&self) -> bool {
        self.test
    }

    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the payload, keeping status, message and params.
    #[must_use]
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            success: self.success,
            message: self.message,
            params: self.params,
            test: self.test,
            data: f(self.data),
        }
    }

    /// Replace the payload, keeping status, message and params.
    #[must_use]
    pub fn with_data<U>(self, data: U) -> Response<U> {
        self.map_data(|_| data)
    }
}

impl<T: Default> Response<T> {
    #[must_use]
    pub fn succeeded(message: impl Into<String>, params: Params) -> Self {
        Self::new(true, Some(message.into()), params, T::default())
    }

    #[must_use]
    pub fn failed(message: impl Into<String>, params: Params) -> Self {
        Self::new(false, Some(message.into()), params, T::default())
    }
}

impl Response<StockLevels> {
    #[must_use]
    pub const fn stock_levels(&self) -> &StockLevels {
        &self.data
    }
}

impl Response<TrackingData> {
    #[must_use]
    pub const fn tracking_numbers(&self) -> &BTreeMap<OrderId, Vec<String>> {
        &self.data.tracking_numbers
    }

    #[must_use]
    pub const fn tracking_companies(&self) -> &BTreeMap<OrderId, Vec<String>> {
        &self.data.tracking_companies
    }

    #[must_use]
    pub const fn tracking_urls(&self) -> &BTreeMap<OrderId, Vec<String>> {
        &self.data.tracking_urls
    }
}
