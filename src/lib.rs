//! User Cache - a user-record HTTP service over a key-value cache
//!
//! Every controller and service call is logged through an interceptor that
//! redacts sensitive values and keeps its context task-local.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
