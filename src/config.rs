//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::logging::SensitiveKeys;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL; the in-process cache is used when unset
    pub cache_url: Option<String>,
    /// Name of the map holding user records
    pub cache_map_name: String,
    /// TTL in seconds applied to the user map on every create
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Key names whose values are masked in call logs
    pub sensitive_keys: SensitiveKeys,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_URL` - Redis URL, e.g. `redis://localhost:6379` (default: unset)
    /// - `CACHE_MAP_NAME` - Name of the user map (default: userCache)
    /// - `CACHE_TTL` - User map TTL in seconds (default: 600)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `SENSITIVE_KEYS` - Comma separated `name[=true|false]` list
    ///   (default: password,secret,token)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_url: env::var("CACHE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            cache_map_name: env::var("CACHE_MAP_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_map_name),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            sensitive_keys: env::var("SENSITIVE_KEYS")
                .ok()
                .map(|v| SensitiveKeys::parse(&v))
                .unwrap_or(defaults.sensitive_keys),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_url: None,
            cache_map_name: "userCache".to_string(),
            cache_ttl: 600,
            cleanup_interval: 1,
            sensitive_keys: SensitiveKeys::default(),
        }
    }
}
