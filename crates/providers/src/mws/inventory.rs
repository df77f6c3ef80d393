//! Paginated stock level listing.

use chrono::Utc;
use fulfillment_core::{Response, StockLevelQuery, StockLevels};
use tracing::debug;

use super::MwsService;
use super::parse::{self, InventoryPage};
use super::requests::{self, QueryParams, Section};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

impl<T: Transport> MwsService<T> {
    async fn fetch_inventory_page(&self, params: &QueryParams, retry: RetryPolicy) -> InventoryPage {
        let max_log = self.config.max_response_log_size();

        match self.commit(Section::Inventory, params, retry).await {
            Ok(body) => parse::parse_inventory(&body, max_log),
            Err(e) => InventoryPage {
                response: parse::parse_error(&e, max_log),
                next_token: None,
            },
        }
    }

    /// Fetch the first page, then follow `NextToken` until it runs out.
    ///
    /// Pages are merged into one map; a SKU seen on more than one page
    /// keeps the value from the later page. A failed page fails the whole
    /// listing.
    pub(crate) async fn list_stock_levels(&self, query: &StockLevelQuery) -> Response<StockLevels> {
        let retry = RetryPolicy::new(query.max_retries);
        let first = requests::inventory_params(&self.config, query, Utc::now());

        let mut levels = StockLevels::new();
        let mut page = self.fetch_inventory_page(&first, retry).await;
        let mut pages = 1_u32;

        loop {
            let InventoryPage {
                response,
                next_token,
            } = page;

            if !response.is_success() {
                debug!(pages, "Stock level listing failed");
                return response;
            }

            let response = response.map_data(|data| levels.extend(data));

            let Some(token) = next_token else {
                debug!(pages, skus = levels.len(), "Stock level listing complete");
                return response.with_data(levels);
            };

            let next = requests::next_inventory_params(&self.config, &token, Utc::now());
            page = self.fetch_inventory_page(&next, retry).await;
            pages += 1;
        }
    }
}
