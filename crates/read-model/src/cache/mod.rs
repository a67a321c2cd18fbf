mod memory_cache;
mod redis_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::ReadModelError;

#[cfg(test)]
use mockall::automock;

/// Expiration settings attached to a cache entry when it is written.
///
/// With neither field set the entry never expires. With both set it expires
/// at whichever deadline comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheEntryOptions {
    /// Entry is evicted after this long without being read or written
    pub sliding_expiration: Option<Duration>,
    /// Entry is evicted this long after being written, regardless of reads
    pub absolute_expiration_relative_to_now: Option<Duration>,
}

impl CacheEntryOptions {
    pub fn sliding(window: Duration) -> Self {
        Self {
            sliding_expiration: Some(window),
            absolute_expiration_relative_to_now: None,
        }
    }

    pub fn absolute(ttl: Duration) -> Self {
        Self {
            sliding_expiration: None,
            absolute_expiration_relative_to_now: Some(ttl),
        }
    }

    pub fn with_absolute_expiration(mut self, ttl: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(ttl);
        self
    }

    /// Time left to live as of `now`, for an entry whose absolute deadline
    /// (if any) is `deadline`. `None` means no expiry.
    pub(crate) fn remaining(&self, deadline: Option<Instant>, now: Instant) -> Option<Duration> {
        let until_deadline = deadline.map(|d| d.saturating_duration_since(now));
        match (self.sliding_expiration, until_deadline) {
            (Some(window), Some(left)) => Some(window.min(left)),
            (Some(window), None) => Some(window),
            (None, left) => left,
        }
    }
}

/// Byte-oriented key-value cache shared between service instances
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DistributedCache: Send + Sync {
    /// Fetch the entry for `key`, refreshing its sliding window on a hit
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ReadModelError>;

    /// Store `value` under `key`, replacing any previous entry
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        options: CacheEntryOptions,
    ) -> Result<(), ReadModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_sliding_only() {
        let options = CacheEntryOptions::sliding(Duration::from_secs(30));
        assert_eq!(
            options.remaining(None, Instant::now()),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_remaining_takes_earliest_deadline() {
        let now = Instant::now();
        let options = CacheEntryOptions::sliding(Duration::from_secs(30))
            .with_absolute_expiration(Duration::from_secs(10));

        let deadline = now + Duration::from_secs(10);
        assert_eq!(
            options.remaining(Some(deadline), now),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            options.remaining(Some(deadline), now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
    }

    #[test]
    fn test_remaining_past_deadline_is_zero() {
        let now = Instant::now();
        let options = CacheEntryOptions::absolute(Duration::from_secs(1));
        let remaining = options.remaining(Some(now), now + Duration::from_secs(5));
        assert_eq!(remaining, Some(Duration::ZERO));
    }

    #[test]
    fn test_no_expiration_by_default() {
        assert_eq!(
            CacheEntryOptions::default().remaining(None, Instant::now()),
            None
        );
    }
}
