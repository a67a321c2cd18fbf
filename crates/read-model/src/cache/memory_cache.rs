use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{CacheEntryOptions, DistributedCache};
use crate::ReadModelError;

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: Vec<u8>,
    options: CacheEntryOptions,
    deadline: Option<Instant>,
}

/// Per-entry expiry: sliding entries are re-armed on every read, absolute
/// deadlines are never extended.
struct EntryExpiry;

impl Expiry<String, MemoryEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &MemoryEntry,
        created_at: Instant,
    ) -> Option<Duration> {
        value.options.remaining(value.deadline, created_at)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &MemoryEntry,
        read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        if value.options.sliding_expiration.is_some() {
            value.options.remaining(value.deadline, read_at)
        } else {
            duration_until_expiry
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &MemoryEntry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.options.remaining(value.deadline, updated_at)
    }
}

/// In-process cache for single-instance deployments and local development
#[derive(Debug, Clone)]
pub struct MemoryCache {
    cache: MokaCache<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        info!("In-memory cache initialized with capacity: {}", max_capacity);
        Self { cache }
    }
}

#[async_trait]
impl DistributedCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ReadModelError> {
        let entry = self.cache.get(key).await;
        debug!(
            "Memory cache {} for key: {}",
            if entry.is_some() { "hit" } else { "miss" },
            key
        );
        Ok(entry.map(|e| e.data))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        options: CacheEntryOptions,
    ) -> Result<(), ReadModelError> {
        let deadline = options
            .absolute_expiration_relative_to_now
            .map(|ttl| Instant::now() + ttl);

        let entry = MemoryEntry {
            data: value,
            options,
            deadline,
        };

        self.cache.insert(key.to_string(), entry).await;
        debug!("Cached value in memory for key: {}", key);
        Ok(())
    }
}
