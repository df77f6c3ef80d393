//! Value types shared by every provider adapter.

pub mod address;
pub mod id;
pub mod order;
pub mod query;
pub mod response;

pub use address::{Address, MAX_NAME_LENGTH, MISSING_STATE, non_blank};
pub use id::*;
pub use order::{FulfillmentOrderRequest, LineItem};
pub use query::{StockLevelQuery, Throttle, TrackingOptions};
pub use response::{Params, Response, StockLevels, TrackingData, normalize_key};
