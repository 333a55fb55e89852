//! API Routes
//!
//! Configures the Axum router with all user service endpoints.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_user_handler, delete_user_handler, get_user_handler, health_handler,
    update_user_handler, AppState,
};
use crate::logging::capture_inbound_request;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /users/create` - Store a user name
/// - `GET /users/get` - Retrieve a user name
/// - `PUT /users/update` - Replace an existing user name
/// - `DELETE /users/delete` - Delete a user
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Inbound request capture: exposes the peer address to call logging
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
///
/// Serve with `into_make_service_with_connect_info::<SocketAddr>()` so call
/// logs carry the client IP; otherwise they report `N/A`.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users/create", post(create_user_handler))
        .route("/users/get", get(get_user_handler))
        .route("/users/update", put(update_user_handler))
        .route("/users/delete", delete(delete_user_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(capture_inbound_request))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
