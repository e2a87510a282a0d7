//! Counting-store backends for rate limiting.
//!
//! # Responsibilities
//! - Abstract the shared counter service behind a small async trait
//! - Provide the Redis-backed production implementation
//! - Provide a process-local implementation for tests and redis-less runs
//!
//! # Design Decisions
//! - increment_and_expire is a single atomic operation from the store's
//!   perspective (Redis MULTI pipeline) so concurrent requests from the
//!   same client never under-count
//! - Connections are acquired per call with a short timeout; a slow or
//!   dead store surfaces as a StoreError for the limiter's policy to handle

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::timeout;

/// Failure talking to the counting store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("timed out acquiring store connection")]
    ConnectTimeout,
}

/// Shared key-value counter with get / atomic increment-and-expire semantics.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Read the current count for a key, if present.
    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Atomically increment a key by one and (re)set its expiry.
    /// Returns the count after the increment.
    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<u64, StoreError>;
}

/// Redis-backed counter store.
pub struct RedisCounterStore {
    client: redis::Client,
    connect_timeout: Duration,
}

impl RedisCounterStore {
    /// Create a store from a Redis URL. The client is lazy: no connection
    /// is made until the first command, so the gateway starts even when
    /// Redis is down (the limiter's failure policy covers that case).
    pub fn new(url: &str, connect_timeout: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            connect_timeout,
        })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::ConnectTimeout)?
        .map_err(StoreError::from)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<u64> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(key, 1u64)
            .expire(key, ttl.as_secs() as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }
}

/// Process-local counter store with TTL eviction.
///
/// Single-instance only: counts are not shared across gateway processes.
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, (u64, Instant)>>,
}

// Expired entries are swept once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let mut entries = self.entries.lock().expect("counter store mutex poisoned");
        match entries.get(key) {
            Some(&(count, expires_at)) if expires_at > Instant::now() => Ok(Some(count)),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("counter store mutex poisoned");

        if entries.len() > SWEEP_THRESHOLD {
            entries.retain(|_, &mut (_, expires_at)| expires_at > now);
        }

        let entry = entries
            .entry(key.to_string())
            .and_modify(|(count, expires_at)| {
                if *expires_at <= now {
                    *count = 0;
                    *expires_at = now + ttl;
                }
                *count += 1;
            })
            .or_insert((1, now + ttl));
        Ok(entry.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_counts() {
        let store = MemoryCounterStore::new();
        let ttl = Duration::from_secs(60);

        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.increment_and_expire("k", ttl).await.unwrap(), 1);
        assert_eq!(store.increment_and_expire("k", ttl).await.unwrap(), 2);
        assert_eq!(store.get("k").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_memory_store_keys_independent() {
        let store = MemoryCounterStore::new();
        let ttl = Duration::from_secs(60);

        store.increment_and_expire("a", ttl).await.unwrap();
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_expiry() {
        let store = MemoryCounterStore::new();
        let ttl = Duration::from_millis(20);

        store.increment_and_expire("k", ttl).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        // A fresh increment restarts the count
        assert_eq!(store.increment_and_expire("k", ttl).await.unwrap(), 1);
    }
}
