use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{CacheEntryOptions, DistributedCache};
use crate::ReadModelError;

// Hash fields of a stored entry. Expirations are in seconds; -1 means unset.
const DATA_FIELD: &str = "data";
const SLIDING_FIELD: &str = "sldexp";
const ABSOLUTE_FIELD: &str = "absexp";
const NOT_PRESENT: i64 = -1;

/// Redis-backed distributed cache.
///
/// Redis has no native sliding expiration, so each entry is stored as a hash
/// carrying its own expiration settings and `get` re-applies the TTL on every
/// hit.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Create new Redis cache
    pub async fn new(redis_url: &str) -> Result<Self, ReadModelError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| ReadModelError::CacheError(format!("Failed to create Redis client: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| ReadModelError::CacheError(format!("Failed to connect to Redis: {}", e)))?;

        info!("Redis cache initialized");
        Ok(Self { conn })
    }

    /// Check if cache is available (health check)
    pub async fn ping(&self) -> Result<(), ReadModelError> {
        let result: Result<String, redis::RedisError> = redis::cmd("PING")
            .query_async(&mut self.conn.clone())
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(ReadModelError::CacheError(format!("Redis ping failed: {}", e))),
        }
    }
}

/// Redis TTLs are whole seconds; round partial seconds up
fn whole_seconds(d: Duration) -> i64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1) as i64
}

/// TTL to apply now given stored sliding window and absolute unix deadline
fn ttl_seconds(sliding: Option<i64>, absolute_deadline: Option<i64>, now: i64) -> Option<i64> {
    let until_deadline = absolute_deadline.map(|deadline| deadline - now);
    match (sliding, until_deadline) {
        (Some(window), Some(left)) => Some(window.min(left)),
        (Some(window), None) => Some(window),
        (None, left) => left,
    }
}

#[async_trait]
impl DistributedCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ReadModelError> {
        let mut conn = self.conn.clone();

        let (data, sliding, absolute): (Option<Vec<u8>>, Option<i64>, Option<i64>) =
            redis::cmd("HMGET")
                .arg(key)
                .arg(DATA_FIELD)
                .arg(SLIDING_FIELD)
                .arg(ABSOLUTE_FIELD)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    error!("Redis read failed for key {}: {}", key, e);
                    ReadModelError::from(e)
                })?;

        let Some(data) = data else {
            debug!("Cache miss for key: {}", key);
            return Ok(None);
        };

        let sliding = sliding.filter(|s| *s != NOT_PRESENT);
        if sliding.is_some() {
            let absolute = absolute.filter(|a| *a != NOT_PRESENT);
            if let Some(ttl) = ttl_seconds(sliding, absolute, Utc::now().timestamp()) {
                if ttl > 0 {
                    redis::cmd("EXPIRE")
                        .arg(key)
                        .arg(ttl)
                        .query_async::<_, ()>(&mut conn)
                        .await?;
                }
            }
        }

        debug!("Cache hit for key: {}", key);
        Ok(Some(data))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        options: CacheEntryOptions,
    ) -> Result<(), ReadModelError> {
        let sliding = options.sliding_expiration.map(whole_seconds);
        let absolute = options
            .absolute_expiration_relative_to_now
            .map(|ttl| Utc::now().timestamp() + whole_seconds(ttl));
        let ttl = ttl_seconds(sliding, absolute, Utc::now().timestamp());

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(key)
            .ignore()
            .cmd("HSET")
            .arg(key)
            .arg(DATA_FIELD)
            .arg(value)
            .arg(SLIDING_FIELD)
            .arg(sliding.unwrap_or(NOT_PRESENT))
            .arg(ABSOLUTE_FIELD)
            .arg(absolute.unwrap_or(NOT_PRESENT))
            .ignore();

        if let Some(ttl) = ttl {
            pipe.cmd("EXPIRE").arg(key).arg(ttl.max(1)).ignore();
        }

        pipe.query_async::<_, ()>(&mut self.conn.clone())
            .await
            .map_err(|e| {
                error!("Failed to set cache for key {}: {}", key, e);
                ReadModelError::from(e)
            })?;

        debug!("Cached value for key: {} with TTL: {:?}s", key, ttl);
        Ok(())
    }
}
