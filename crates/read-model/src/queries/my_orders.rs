use common::metrics;
use domain::CustomerOrdersWithItemsSpecification;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::{CacheEntryOptions, DistributedCache};
use crate::repositories::OrderRepository;
use crate::views::OrderSummary;
use crate::ReadModelError;

/// Prefix shared by every key this application writes to the cache
pub const CACHE_NAMESPACE: &str = "eShopOnWeb";

/// How long a cached order history survives without being read
pub const MY_ORDERS_SLIDING_EXPIRATION: Duration = Duration::from_secs(30);

const QUERY_TYPE: &str = "GetMyOrders";
const CACHE_TYPE: &str = "my_orders";

/// Cache key for one user's order history.
///
/// The user name is interpolated verbatim: a name containing `:` can produce
/// the same key as a different namespace/label combination.
pub fn my_orders_cache_key(user_name: &str) -> String {
    format!("{CACHE_NAMESPACE}:MyOrders:userName:{user_name}")
}

/// Serves a customer's order history, read through the distributed cache.
///
/// Concurrent misses for the same user are not coalesced; each one queries
/// the repository and the last cache write wins.
pub struct OrderHistoryLookup {
    repository: Arc<dyn OrderRepository>,
    cache: Arc<dyn DistributedCache>,
}

impl OrderHistoryLookup {
    pub fn new(repository: Arc<dyn OrderRepository>, cache: Arc<dyn DistributedCache>) -> Self {
        Self { repository, cache }
    }

    /// Order history for `user_name`, newest data at most one sliding window old.
    ///
    /// Cache and repository failures are returned as-is; nothing is written
    /// to the cache unless the repository query succeeded. Cancelling
    /// `cancel` aborts a pending repository query with
    /// [`ReadModelError::Cancelled`].
    pub async fn get(
        &self,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<OrderSummary>, ReadModelError> {
        let start = Instant::now();
        let result = self.fetch(user_name, cancel).await;
        metrics::record_query(QUERY_TYPE, result.is_ok(), start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            error!("Failed to get order history for user {}: {}", user_name, e);
        }

        result
    }

    async fn fetch(
        &self,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<OrderSummary>, ReadModelError> {
        let cache_key = my_orders_cache_key(user_name);

        if let Some(encoded) = self.cache.get(&cache_key).await? {
            metrics::record_cache_request(CACHE_TYPE, true);
            debug!("Cache hit for order history of user: {}", user_name);

            let json = String::from_utf8(encoded)?;
            return Ok(serde_json::from_str(&json)?);
        }

        metrics::record_cache_request(CACHE_TYPE, false);
        debug!("Cache miss for order history of user: {}, querying repository", user_name);

        let spec = CustomerOrdersWithItemsSpecification::new(user_name);
        let orders = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReadModelError::Cancelled),
            result = self.repository.list(&spec) => result?,
        };

        info!("Fetched {} orders for user: {}", orders.len(), user_name);

        let summaries: Vec<OrderSummary> = orders.iter().map(OrderSummary::from).collect();

        let encoded = serde_json::to_string(&summaries)?.into_bytes();
        self.cache
            .set(
                &cache_key,
                encoded,
                CacheEntryOptions::sliding(MY_ORDERS_SLIDING_EXPIRATION),
            )
            .await?;

        Ok(summaries)
    }
}
