pub mod cache;
pub mod queries;
pub mod repositories;
pub mod views;

pub use cache::{CacheEntryOptions, DistributedCache, MemoryCache, RedisCache};
pub use queries::OrderHistoryLookup;
pub use repositories::{OrderRepository, PostgresOrderRepository};
pub use views::{OrderItemSummary, OrderSummary};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadModelError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cached value is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] domain::DomainError),

    #[error("Query cancelled")]
    Cancelled,
}

impl From<redis::RedisError> for ReadModelError {
    fn from(e: redis::RedisError) -> Self {
        ReadModelError::CacheError(e.to_string())
    }
}
