//! Request DTOs for the user API
//!
//! Query-string parameters of the `/users` endpoints. Field names on the
//! wire are camelCase (`userId`, `userName`, `newUserName`).

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Parameters of `POST /users/create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    pub user_id: String,
    pub user_name: String,
}

/// Parameters of `GET /users/get` and `DELETE /users/delete`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdParams {
    pub user_id: String,
}

/// Parameters of `PUT /users/update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub user_id: String,
    pub new_user_name: String,
}

/// Validates a user id.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_user_id(user_id: &str) -> Option<String> {
    if user_id.trim().is_empty() {
        return Some("userId cannot be empty".to_string());
    }
    if user_id.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "userId exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
