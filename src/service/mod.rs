//! Service Module
//!
//! Business operations on top of the cache backend.

mod user_service;

pub use user_service::{UserService, DEFAULT_USER_MAP, DEFAULT_USER_TTL};
