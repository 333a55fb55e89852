//! Cache Backend Module
//!
//! Async interface over a store of named maps, and its in-process
//! implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::error::Result;

// == Cache Backend ==
/// Named-map operations used by the service layer.
///
/// Maps behave like Redis hashes: they spring into existence on the first
/// `put`, carry one TTL for all their fields, and vanish with their last
/// field.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Stores `value` under `field` of `map`.
    async fn put(&self, map: &str, field: &str, value: &str) -> Result<()>;

    /// Overwrites `field` of `map` if, and only if, it already exists.
    ///
    /// The check and the write are one atomic step, so a field removed or
    /// expired concurrently is never brought back. Returns whether the
    /// value was written.
    async fn replace(&self, map: &str, field: &str, value: &str) -> Result<bool>;

    /// Value of `field` in `map`, if present and not expired.
    async fn get(&self, map: &str, field: &str) -> Result<Option<String>>;

    /// Whether `field` exists in `map`.
    async fn contains_key(&self, map: &str, field: &str) -> Result<bool>;

    /// Removes `field` from `map`, returning whether it existed.
    async fn remove(&self, map: &str, field: &str) -> Result<bool>;

    /// Sets `map` to expire `ttl` from now. Returns false if `map` does not exist.
    async fn expire(&self, map: &str, ttl: Duration) -> Result<bool>;
}

// == In-Memory Backend ==
/// Backend over a [`CacheStore`] shared behind an async lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    store: Arc<RwLock<CacheStore>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the underlying store, for the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }
}

// Reads take the write lock too: they drop expired maps on access.
#[async_trait]
impl CacheBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn put(&self, map: &str, field: &str, value: &str) -> Result<()> {
        self.store.write().await.put(map, field, value)
    }

    async fn replace(&self, map: &str, field: &str, value: &str) -> Result<bool> {
        self.store.write().await.replace(map, field, value)
    }

    async fn get(&self, map: &str, field: &str) -> Result<Option<String>> {
        Ok(self.store.write().await.get(map, field))
    }

    async fn contains_key(&self, map: &str, field: &str) -> Result<bool> {
        Ok(self.store.write().await.contains_key(map, field))
    }

    async fn remove(&self, map: &str, field: &str) -> Result<bool> {
        Ok(self.store.write().await.remove(map, field))
    }

    async fn expire(&self, map: &str, ttl: Duration) -> Result<bool> {
        Ok(self.store.write().await.expire(map, ttl))
    }
}
