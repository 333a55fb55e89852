//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers only bind parameters;
//! the work happens in [`UserController`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::UserController;
use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::Result;
use crate::logging::{Interceptor, SensitiveDataFilter};
use crate::models::{CreateUserParams, HealthResponse, UpdateUserParams, UserIdParams};
use crate::service::UserService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Intercepted entry points for the user endpoints
    pub controller: UserController,
    /// Name of the cache backend, reported by the health endpoint
    pub cache_name: &'static str,
}

impl AppState {
    /// Wires interceptor, service and controller over `backend`.
    ///
    /// The sensitive key list, map name and TTL come from `config`.
    pub fn new(backend: Arc<dyn CacheBackend>, config: &Config) -> Self {
        let interceptor = Interceptor::new(SensitiveDataFilter::new(&config.sensitive_keys));
        let cache_name = backend.name();
        let service = UserService::from_config(backend, interceptor.clone(), config);

        Self {
            controller: UserController::new(service, interceptor),
            cache_name,
        }
    }
}

/// Handler for POST /users/create?userId=&userName=
pub async fn create_user_handler(
    State(state): State<AppState>,
    Query(params): Query<CreateUserParams>,
) -> Result<&'static str> {
    state
        .controller
        .create_user(&params.user_id, &params.user_name)
        .await
}

/// Handler for GET /users/get?userId=
pub async fn get_user_handler(
    State(state): State<AppState>,
    Query(params): Query<UserIdParams>,
) -> Result<String> {
    state.controller.get_user(&params.user_id).await
}

/// Handler for PUT /users/update?userId=&newUserName=
pub async fn update_user_handler(
    State(state): State<AppState>,
    Query(params): Query<UpdateUserParams>,
) -> Result<&'static str> {
    state
        .controller
        .update_user(&params.user_id, &params.new_user_name)
        .await
}

/// Handler for DELETE /users/delete?userId=
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Query(params): Query<UserIdParams>,
) -> Result<&'static str> {
    state.controller.delete_user(&params.user_id).await
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache_name))
}
