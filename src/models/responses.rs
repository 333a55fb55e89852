//! Response DTOs for the user API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Body of a successful `POST /users/create`
pub const USER_CREATED: &str = "User created successfully!";

/// Body of a successful `PUT /users/update`
pub const USER_UPDATED: &str = "User updated successfully!";

/// Body of a successful `DELETE /users/delete`
pub const USER_DELETED: &str = "User deleted successfully!";

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Name of the cache backend in use
    pub cache: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            cache: cache.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
