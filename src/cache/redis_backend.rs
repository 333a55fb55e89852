//! Redis Backend Module
//!
//! Stores each named map as a Redis hash.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::cache::{validate_entry, CacheBackend};
use crate::error::Result;

/// Writes `ARGV[2]` to field `ARGV[1]` of hash `KEYS[1]` only if that field
/// exists. Returns 1 when written.
const REPLACE_SCRIPT: &str = r#"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
    return 1
end
return 0
"#;

// == Redis Backend ==
/// Backend issuing `HSET`/`HGET`/`HEXISTS`/`HDEL`/`PEXPIRE` over a
/// reconnecting connection manager. Conditional replace runs as a Lua
/// script so the existence check and the write are atomic.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Opens a managed connection to the server at `url`.
    ///
    /// # Arguments
    /// * `url` - Connection URL, e.g. `redis://:password@localhost:6379/0`
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, map: &str, field: &str, value: &str) -> Result<()> {
        validate_entry(field, value)?;
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(map, field, value).await?;
        Ok(())
    }

    async fn replace(&self, map: &str, field: &str, value: &str) -> Result<bool> {
        validate_entry(field, value)?;
        let mut conn = self.conn.clone();
        let written: i64 = redis::Script::new(REPLACE_SCRIPT)
            .key(map)
            .arg(field)
            .arg(value)
            .invoke_async(&mut conn)
            .await?;
        Ok(written == 1)
    }

    async fn get(&self, map: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(map, field).await?;

        match &value {
            Some(_) => debug!("Cache hit for '{}' in '{}'", field, map),
            None => debug!("Cache miss for '{}' in '{}'", field, map),
        }

        Ok(value)
    }

    async fn contains_key(&self, map: &str, field: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        Ok(conn.hexists(map, field).await?)
    }

    async fn remove(&self, map: &str, field: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.hdel(map, field).await?;
        Ok(removed > 0)
    }

    async fn expire(&self, map: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let applied: bool = conn.pexpire(map, expiry_millis(ttl)).await?;
        Ok(applied)
    }
}

/// TTL in whole milliseconds for `PEXPIRE`, at least 1.
fn expiry_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX).max(1)
}
