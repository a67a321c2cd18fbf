mod my_orders;

pub use my_orders::{my_orders_cache_key, OrderHistoryLookup, CACHE_NAMESPACE, MY_ORDERS_SLIDING_EXPIRATION};
