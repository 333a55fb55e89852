//! Cache Module
//!
//! Named-map cache with map-level TTL, in process or on Redis.

mod backend;
mod entry;
mod redis_backend;
mod store;

use crate::error::{AppError, Result};

// Re-export public types
pub use backend::{CacheBackend, InMemoryBackend};
pub use entry::MapEntry;
pub use redis_backend::RedisBackend;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed field length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Entry Validation ==
/// Checks `field` and `value` against [`MAX_KEY_LENGTH`] and
/// [`MAX_VALUE_SIZE`]. Every backend runs this before writing.
pub fn validate_entry(field: &str, value: &str) -> Result<()> {
    if field.len() > MAX_KEY_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    if value.len() > MAX_VALUE_SIZE {
        return Err(AppError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }

    Ok(())
}
