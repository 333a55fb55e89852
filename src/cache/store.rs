//! Cache Store Module
//!
//! In-process storage of named maps with map-level TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{validate_entry, MapEntry};
use crate::error::Result;

// == Cache Store ==
/// Named maps keyed by map name. Expired maps read as empty and are
/// dropped on access or by [`CacheStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct CacheStore {
    maps: HashMap<String, MapEntry>,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Stores `value` under `field` of `map`, creating the map if needed.
    ///
    /// A new map has no expiry until [`CacheStore::expire`] is called.
    ///
    /// # Arguments
    /// * `map` - Name of the map
    /// * `field` - Field to store
    /// * `value` - Value to store
    pub fn put(&mut self, map: &str, field: &str, value: &str) -> Result<()> {
        validate_entry(field, value)?;

        self.purge_if_expired(map);
        self.maps
            .entry(map.to_string())
            .or_insert_with(MapEntry::new)
            .fields
            .insert(field.to_string(), value.to_string());

        Ok(())
    }

    // == Replace ==
    /// Overwrites `field` of `map` only if it is already present.
    ///
    /// Returns false, creating nothing, when the map is absent or expired or
    /// lacks the field. The map's expiry is left as it was.
    pub fn replace(&mut self, map: &str, field: &str, value: &str) -> Result<bool> {
        validate_entry(field, value)?;
        self.purge_if_expired(map);

        match self
            .maps
            .get_mut(map)
            .and_then(|entry| entry.fields.get_mut(field))
        {
            Some(existing) => {
                *existing = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // == Get ==
    /// Returns the value of `field` in `map`, or None if absent or expired.
    pub fn get(&mut self, map: &str, field: &str) -> Option<String> {
        self.live_map(map)
            .and_then(|entry| entry.fields.get(field).cloned())
    }

    // == Contains Key ==
    pub fn contains_key(&mut self, map: &str, field: &str) -> bool {
        self.live_map(map)
            .map(|entry| entry.fields.contains_key(field))
            .unwrap_or(false)
    }

    // == Remove ==
    /// Removes `field` from `map`. Returns true if it was present.
    ///
    /// A map left without fields is dropped along with its expiry.
    pub fn remove(&mut self, map: &str, field: &str) -> bool {
        self.purge_if_expired(map);

        let Some(entry) = self.maps.get_mut(map) else {
            return false;
        };

        let removed = entry.fields.remove(field).is_some();
        if entry.fields.is_empty() {
            self.maps.remove(map);
        }
        removed
    }

    // == Expire ==
    /// Sets `map` to expire `ttl` from now.
    ///
    /// Returns false, leaving nothing behind, when the map does not exist.
    pub fn expire(&mut self, map: &str, ttl: Duration) -> bool {
        self.purge_if_expired(map);

        match self.maps.get_mut(map) {
            Some(entry) => {
                entry.expire_in(ttl);
                true
            }
            None => false,
        }
    }

    // == TTL ==
    /// Remaining TTL of `map` in milliseconds, None if absent or without expiry.
    pub fn ttl_remaining_ms(&mut self, map: &str) -> Option<u64> {
        self.live_map(map).and_then(MapEntry::ttl_remaining_ms)
    }

    // == Cleanup Expired ==
    /// Removes all expired maps from the store.
    ///
    /// Returns the number of maps removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.maps.len();
        self.maps.retain(|_, entry| !entry.is_expired());
        before - self.maps.len()
    }

    // == Length ==
    /// Returns the number of maps held, expired ones included.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    fn live_map(&mut self, map: &str) -> Option<&MapEntry> {
        self.purge_if_expired(map);
        self.maps.get(map)
    }

    fn purge_if_expired(&mut self, map: &str) {
        if self.maps.get(map).is_some_and(MapEntry::is_expired) {
            self.maps.remove(map);
        }
    }
}
