//! Options for stock level and tracking lookups.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::id::Sku;

/// Parameters for a stock level listing.
///
/// With explicit SKUs the listing covers exactly those items and is never
/// paginated. Without them, the provider lists everything changed since
/// `start_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLevelQuery {
    pub skus: Vec<Sku>,
    pub start_time: Option<DateTime<Utc>>,
    pub response_group: Option<String>,
    /// Extra attempts after a 503 response. Zero disables retrying.
    pub max_retries: u32,
}

impl StockLevelQuery {
    /// List every SKU known to the provider.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// List only the given SKUs.
    #[must_use]
    pub fn for_skus<I, S>(skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Sku>,
    {
        Self {
            skus: skus.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub fn with_response_group(mut self, group: impl Into<String>) -> Self {
        self.response_group = Some(group.into());
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Pause for `sleep` after every `interval` tracking lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub interval: u32,
    pub sleep: Duration,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: u32, sleep: Duration) -> Self {
        Self { interval, sleep }
    }

    /// Whether to pause after the request at 1-based `position`.
    #[must_use]
    pub const fn should_pause_after(&self, position: u32) -> bool {
        self.interval > 0 && position % self.interval == 0
    }
}

/// Options for a tracking lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingOptions {
    pub throttle: Option<Throttle>,
    pub max_retries: u32,
}

impl TrackingOptions {
    #[must_use]
    pub const fn with_throttle(mut self, interval: u32, sleep: Duration) -> Self {
        self.throttle = Some(Throttle::new(interval, sleep));
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_pauses_on_multiples_of_interval() {
        let throttle = Throttle::new(10, Duration::from_secs(1));
        let pauses: Vec<u32> = (1..=30).filter(|i| throttle.should_pause_after(*i)).collect();
        assert_eq!(pauses, vec![10, 20, 30]);
    }

    #[test]
    fn test_interval_of_one_pauses_after_every_lookup() {
        let throttle = Throttle::new(1, Duration::from_secs(1));
        assert!((1..=3).all(|i| throttle.should_pause_after(i)));
    }

    #[test]
    fn test_zero_interval_never_pauses() {
        let throttle = Throttle::new(0, Duration::from_secs(1));
        assert!(!(1..=100).any(|i| throttle.should_pause_after(i)));
    }

    #[test]
    fn test_query_for_skus() {
        let query = StockLevelQuery::for_skus(["GN-00-01A", "GN-00-02A"]).with_max_retries(2);
        assert_eq!(query.skus.len(), 2);
        assert_eq!(query.max_retries, 2);
    }
}
