//! Request and Response models for the user API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query parameters and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_user_id, CreateUserParams, UpdateUserParams, UserIdParams};
pub use responses::{ErrorResponse, HealthResponse, USER_CREATED, USER_DELETED, USER_UPDATED};
