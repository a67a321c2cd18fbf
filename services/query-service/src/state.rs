use anyhow::Result;
use common::config::{AppConfig, CacheBackend};
use read_model::{
    DistributedCache, MemoryCache, OrderHistoryLookup, OrderRepository, PostgresOrderRepository,
    RedisCache,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderHistoryLookup>,
    pub pool: PgPool,
    /// Present only when Redis backs the cache; used for health checks
    pub redis: Option<RedisCache>,
    /// Cancelled on shutdown; in-flight lookups watch a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub async fn new(config: &AppConfig, shutdown: CancellationToken) -> Result<Self> {
        tracing::info!("Initializing application state...");

        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!("Database connected");

        let repository =
            Arc::new(PostgresOrderRepository::new(pool.clone())) as Arc<dyn OrderRepository>;

        let (cache, redis): (Arc<dyn DistributedCache>, Option<RedisCache>) =
            match config.cache.backend {
                CacheBackend::Redis => {
                    tracing::info!("Connecting to Redis...");
                    let redis = RedisCache::new(&config.cache.redis_url).await?;
                    tracing::info!("Redis connected");
                    (Arc::new(redis.clone()), Some(redis))
                }
                CacheBackend::Memory => {
                    tracing::info!("Using in-memory cache");
                    (Arc::new(MemoryCache::new(config.cache.memory_capacity)), None)
                }
            };

        Ok(Self::from_parts(
            OrderHistoryLookup::new(repository, cache),
            pool,
            redis,
            shutdown,
        ))
    }

    pub fn from_parts(
        orders: OrderHistoryLookup,
        pool: PgPool,
        redis: Option<RedisCache>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            orders: Arc::new(orders),
            pool,
            redis,
            shutdown,
        }
    }
}
