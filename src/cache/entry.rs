//! Map Entry Module
//!
//! A named map of string fields sharing one optional expiry.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Map Entry ==
/// One named map held by the cache, with map-level TTL.
#[derive(Debug, Clone, Default)]
pub struct MapEntry {
    /// Field -> value pairs
    pub fields: HashMap<String, String>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl MapEntry {
    // == Constructor ==
    /// Creates an empty map without expiry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Expire ==
    /// Sets the map to expire `ttl` from now, replacing any previous expiry.
    pub fn expire_in(&mut self, ttl: Duration) {
        self.expires_at = Some(current_timestamp_ms() + ttl.as_millis() as u64);
    }

    // == Is Expired ==
    /// Checks if the map has expired.
    ///
    /// A map is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the map has expired
    /// - `Some(remaining_ms)` if the map has TTL and hasn't expired
    /// - `None` if the map never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
