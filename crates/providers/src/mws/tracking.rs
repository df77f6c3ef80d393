//! Per-order tracking lookups.

use chrono::Utc;
use fulfillment_core::{OrderId, Params, Response, TrackingData, TrackingOptions};
use tracing::{debug, info};

use super::MwsService;
use super::parse::{self, SUCCESS};
use super::requests::{self, Section};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

impl<T: Transport> MwsService<T> {
    async fn fetch_order_tracking(&self, order_id: &OrderId, retry: RetryPolicy) -> Response<TrackingData> {
        let params = requests::tracking_params(&self.config, order_id, Utc::now());
        let max_log = self.config.max_response_log_size();

        let response = match self.commit(Section::Outbound, &params, retry).await {
            Ok(body) => parse::parse_tracking(&body, order_id, max_log),
            Err(e) => parse::parse_error(&e, max_log),
        };

        if parse::is_order_not_found(&response) {
            info!(%order_id, "Order not found, treating as no tracking");
            return parse::empty_tracking();
        }

        response
    }

    /// Look up each order in turn and merge the results.
    ///
    /// Stops at the first failure other than "order not found" and returns
    /// it. With a throttle, sleeps after every `interval`th lookup.
    pub(crate) async fn track_orders(
        &self,
        order_ids: &[OrderId],
        options: &TrackingOptions,
    ) -> Response<TrackingData> {
        let retry = RetryPolicy::new(options.max_retries);
        let mut data = TrackingData::default();
        let mut last: Option<Response> = None;

        for (position, order_id) in (1_u32..).zip(order_ids) {
            let response = self.fetch_order_tracking(order_id, retry).await;
            if !response.is_success() {
                debug!(%order_id, position, "Tracking lookup failed, aborting");
                return response;
            }

            last = Some(response.map_data(|found| data.merge(found)));

            if let Some(throttle) = options.throttle
                && throttle.should_pause_after(position)
            {
                debug!(position, sleep = ?throttle.sleep, "Throttling tracking lookups");
                tokio::time::sleep(throttle.sleep).await;
            }
        }

        match last {
            Some(response) => response.with_data(data),
            None => {
                let mut params = Params::new();
                params.insert("response_status", SUCCESS);
                Response::new(true, None, params, data)
            }
        }
    }
}
