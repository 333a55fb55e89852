//! API Module
//!
//! HTTP handlers, routing and the intercepted controller for the user API.
//!
//! # Endpoints
//! - `POST /users/create?userId=&userName=` - Store a user name
//! - `GET /users/get?userId=` - Retrieve a user name
//! - `PUT /users/update?userId=&newUserName=` - Replace an existing user name
//! - `DELETE /users/delete?userId=` - Delete a user
//! - `GET /health` - Health check endpoint

pub mod controller;
pub mod handlers;
pub mod routes;

pub use controller::UserController;
pub use handlers::*;
pub use routes::create_router;
