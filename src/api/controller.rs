//! User Controller
//!
//! Request-handling entry points for the `/users` endpoints. Each method is
//! intercepted and logged as a `Controller` call before delegating to the
//! [`UserService`].

use crate::error::{AppError, Result};
use crate::logging::Interceptor;
use crate::models::{validate_user_id, USER_CREATED, USER_DELETED, USER_UPDATED};
use crate::service::UserService;

#[derive(Clone)]
pub struct UserController {
    service: UserService,
    interceptor: Interceptor,
}

impl UserController {
    pub fn new(service: UserService, interceptor: Interceptor) -> Self {
        Self {
            service,
            interceptor,
        }
    }

    pub async fn create_user(&self, user_id: &str, user_name: &str) -> Result<&'static str> {
        self.interceptor
            .intercept::<Self, _>(
                "create_user",
                &[&user_id, &user_name],
                self.handle_create(user_id, user_name),
            )
            .await
    }

    /// Returns the stored user name, or `NotFound` when absent or expired.
    pub async fn get_user(&self, user_id: &str) -> Result<String> {
        self.interceptor
            .intercept::<Self, _>("get_user", &[&user_id], self.handle_get(user_id))
            .await
    }

    /// Updates an existing user. Unknown ids are accepted and left absent.
    pub async fn update_user(&self, user_id: &str, new_user_name: &str) -> Result<&'static str> {
        self.interceptor
            .intercept::<Self, _>(
                "update_user",
                &[&user_id, &new_user_name],
                self.handle_update(user_id, new_user_name),
            )
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<&'static str> {
        self.interceptor
            .intercept::<Self, _>("delete_user", &[&user_id], self.handle_delete(user_id))
            .await
    }

    async fn handle_create(&self, user_id: &str, user_name: &str) -> Result<&'static str> {
        check_user_id(user_id)?;
        self.service.create_user(user_id, user_name).await?;
        Ok(USER_CREATED)
    }

    async fn handle_get(&self, user_id: &str) -> Result<String> {
        check_user_id(user_id)?;
        self.service
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(user_id.to_string()))
    }

    async fn handle_update(&self, user_id: &str, new_user_name: &str) -> Result<&'static str> {
        check_user_id(user_id)?;
        self.service.update_user(user_id, new_user_name).await?;
        Ok(USER_UPDATED)
    }

    async fn handle_delete(&self, user_id: &str) -> Result<&'static str> {
        check_user_id(user_id)?;
        self.service.delete_user(user_id).await?;
        Ok(USER_DELETED)
    }
}

fn check_user_id(user_id: &str) -> Result<()> {
    match validate_user_id(user_id) {
        Some(msg) => Err(AppError::InvalidRequest(msg)),
        None => Ok(()),
    }
}
