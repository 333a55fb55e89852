//! User Service
//!
//! CRUD operations on user names stored in one named cache map.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::CacheBackend;
use crate::config::Config;
use crate::error::Result;
use crate::logging::Interceptor;

/// Map holding user records when not configured otherwise.
pub const DEFAULT_USER_MAP: &str = "userCache";

/// Expiry applied to the user map on every create.
pub const DEFAULT_USER_TTL: Duration = Duration::from_secs(10 * 60);

// == User Service ==
/// Stores `userId -> userName` pairs as fields of a single cache map.
///
/// Every method runs through the [`Interceptor`] and is logged as a
/// `Service` call.
#[derive(Clone)]
pub struct UserService {
    backend: Arc<dyn CacheBackend>,
    interceptor: Interceptor,
    map_name: String,
    ttl: Duration,
}

impl UserService {
    pub fn new(backend: Arc<dyn CacheBackend>, interceptor: Interceptor) -> Self {
        Self {
            backend,
            interceptor,
            map_name: DEFAULT_USER_MAP.to_string(),
            ttl: DEFAULT_USER_TTL,
        }
    }

    /// Creates a service using the map name and TTL from `config`.
    pub fn from_config(
        backend: Arc<dyn CacheBackend>,
        interceptor: Interceptor,
        config: &Config,
    ) -> Self {
        Self {
            map_name: config.cache_map_name.clone(),
            ttl: Duration::from_secs(config.cache_ttl),
            ..Self::new(backend, interceptor)
        }
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Create ==
    /// Stores `user_name` under `user_id` and restarts the map's expiry.
    pub async fn create_user(&self, user_id: &str, user_name: &str) -> Result<()> {
        self.interceptor
            .intercept::<Self, _>(
                "create_user",
                &[&user_id, &user_name],
                self.store_user(user_id, user_name),
            )
            .await
    }

    // == Read ==
    /// Returns the user name stored under `user_id`, if any.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<String>> {
        self.interceptor
            .intercept::<Self, _>("get_user", &[&user_id], async {
                self.backend.get(&self.map_name, user_id).await
            })
            .await
    }

    // == Update ==
    /// Replaces the user name of an existing user. Unknown ids are left
    /// untouched and `false` is returned.
    ///
    /// The map's expiry is not refreshed.
    pub async fn update_user(&self, user_id: &str, new_user_name: &str) -> Result<bool> {
        self.interceptor
            .intercept::<Self, _>(
                "update_user",
                &[&user_id, &new_user_name],
                self.replace_existing_user(user_id, new_user_name),
            )
            .await
    }

    // == Delete ==
    /// Removes the user stored under `user_id`. Returns whether it existed.
    pub async fn delete_user(&self, user_id: &str) -> Result<bool> {
        self.interceptor
            .intercept::<Self, _>("delete_user", &[&user_id], async {
                self.backend.remove(&self.map_name, user_id).await
            })
            .await
    }

    async fn store_user(&self, user_id: &str, user_name: &str) -> Result<()> {
        self.backend.put(&self.map_name, user_id, user_name).await?;
        self.backend.expire(&self.map_name, self.ttl).await?;
        debug!("Stored user '{}' in '{}'", user_id, self.map_name);
        Ok(())
    }

    async fn replace_existing_user(&self, user_id: &str, new_user_name: &str) -> Result<bool> {
        let replaced = self
            .backend
            .replace(&self.map_name, user_id, new_user_name)
            .await?;
        if !replaced {
            debug!("Skipping update of unknown user '{}'", user_id);
        }
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, InMemoryBackend};
    use crate::error::AppError;
    use crate::logging::{CallContext, ClassType};
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    fn service_with_store() -> (UserService, Arc<RwLock<CacheStore>>) {
        let backend = InMemoryBackend::new();
        let store = backend.store();
        (UserService::new(Arc::new(backend), Interceptor::default()), store)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, _) = service_with_store();

        service.create_user("u1", "Alice").await.unwrap();

        assert_eq!(service.get_user("u1").await.unwrap().as_deref(), Some("Alice"));
        assert!(service.get_user("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_sets_ten_minute_expiry() {
        let (service, store) = service_with_store();

        service.create_user("u1", "Alice").await.unwrap();

        let remaining = store.write().await.ttl_remaining_ms(DEFAULT_USER_MAP).unwrap();
        assert!(remaining > 599_000 && remaining <= 600_000);
    }

    #[tokio::test]
    async fn test_update_existing_user() {
        let (service, _) = service_with_store();
        service.create_user("u1", "Alice").await.unwrap();

        assert!(service.update_user("u1", "Bob").await.unwrap());
        assert_eq!(service.get_user("u1").await.unwrap().as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_noop() {
        let (service, store) = service_with_store();

        assert!(!service.update_user("ghost", "Bob").await.unwrap());
        assert!(service.get_user("ghost").await.unwrap().is_none());
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, _) = service_with_store();
        service.create_user("u1", "Alice").await.unwrap();

        assert!(service.delete_user("u1").await.unwrap());
        assert!(service.get_user("u1").await.unwrap().is_none());
        assert!(!service.delete_user("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_records_expire_with_map() {
        let backend = Arc::new(InMemoryBackend::new());
        let config = Config {
            cache_ttl: 0,
            ..Config::default()
        };
        let service = UserService::from_config(backend, Interceptor::default(), &config);

        service.create_user("u1", "Alice").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(service.get_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = Config {
            cache_map_name: "people".to_string(),
            cache_ttl: 30,
            ..Config::default()
        };
        let service =
            UserService::from_config(Arc::new(InMemoryBackend::new()), Interceptor::default(), &config);

        assert_eq!(service.map_name(), "people");
        assert_eq!(service.ttl(), Duration::from_secs(30));
    }

    // == Failing Backend ==
    struct UnavailableBackend;

    #[async_trait]
    impl CacheBackend for UnavailableBackend {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        async fn put(&self, _: &str, _: &str, _: &str) -> Result<()> {
            Err(AppError::Cache("connection refused".to_string()))
        }

        async fn replace(&self, _: &str, _: &str, _: &str) -> Result<bool> {
            Err(AppError::Cache("connection refused".to_string()))
        }

        async fn get(&self, _: &str, _: &str) -> Result<Option<String>> {
            Err(AppError::Cache("connection refused".to_string()))
        }

        async fn contains_key(&self, _: &str, _: &str) -> Result<bool> {
            Err(AppError::Cache("connection refused".to_string()))
        }

        async fn remove(&self, _: &str, _: &str) -> Result<bool> {
            Err(AppError::Cache("connection refused".to_string()))
        }

        async fn expire(&self, _: &str, _: Duration) -> Result<bool> {
            Err(AppError::Cache("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_and_context_is_released() {
        let service = UserService::new(Arc::new(UnavailableBackend), Interceptor::default());

        let err = service.create_user("u1", "Alice").await.unwrap_err();
        assert!(matches!(err, AppError::Cache(ref msg) if msg == "connection refused"));
        assert!(CallContext::current().is_none());

        assert!(matches!(service.update_user("u1", "Bob").await, Err(AppError::Cache(_))));
    }

    #[tokio::test]
    async fn test_runs_as_service_call() {
        struct ContextRecorder;

        #[async_trait]
        impl CacheBackend for ContextRecorder {
            fn name(&self) -> &'static str {
                "recorder"
            }

            async fn put(&self, _: &str, _: &str, _: &str) -> Result<()> {
                Ok(())
            }

            async fn replace(&self, _: &str, _: &str, _: &str) -> Result<bool> {
                Ok(false)
            }

            async fn get(&self, _: &str, _: &str) -> Result<Option<String>> {
                Ok(CallContext::current().map(|ctx| ctx.class_type.to_string()))
            }

            async fn contains_key(&self, _: &str, _: &str) -> Result<bool> {
                Ok(false)
            }

            async fn remove(&self, _: &str, _: &str) -> Result<bool> {
                Ok(false)
            }

            async fn expire(&self, _: &str, _: Duration) -> Result<bool> {
                Ok(false)
            }
        }

        let service = UserService::new(Arc::new(ContextRecorder), Interceptor::default());

        let seen = service.get_user("u1").await.unwrap();
        assert_eq!(seen.as_deref(), Some(ClassType::Service.as_str()));
    }

    // == Delayed Backend ==
    /// In-memory backend whose replace starts late, letting other calls
    /// run first.
    struct DelayedReplace {
        inner: InMemoryBackend,
        delay: Duration,
    }

    #[async_trait]
    impl CacheBackend for DelayedReplace {
        fn name(&self) -> &'static str {
            "delayed"
        }

        async fn put(&self, map: &str, field: &str, value: &str) -> Result<()> {
            self.inner.put(map, field, value).await
        }

        async fn replace(&self, map: &str, field: &str, value: &str) -> Result<bool> {
            tokio::time::sleep(self.delay).await;
            self.inner.replace(map, field, value).await
        }

        async fn get(&self, map: &str, field: &str) -> Result<Option<String>> {
            self.inner.get(map, field).await
        }

        async fn contains_key(&self, map: &str, field: &str) -> Result<bool> {
            self.inner.contains_key(map, field).await
        }

        async fn remove(&self, map: &str, field: &str) -> Result<bool> {
            self.inner.remove(map, field).await
        }

        async fn expire(&self, map: &str, ttl: Duration) -> Result<bool> {
            self.inner.expire(map, ttl).await
        }
    }

    fn delayed_service(delay: Duration, ttl: Duration) -> (UserService, Arc<RwLock<CacheStore>>) {
        let inner = InMemoryBackend::new();
        let store = inner.store();
        let service = UserService {
            ttl,
            ..UserService::new(Arc::new(DelayedReplace { inner, delay }), Interceptor::default())
        };
        (service, store)
    }

    #[tokio::test]
    async fn test_update_racing_delete_does_not_restore_user() {
        let (service, store) = delayed_service(Duration::from_millis(50), DEFAULT_USER_TTL);
        service.create_user("u1", "Alice").await.unwrap();

        let update = service.update_user("u1", "Bob");
        let delete = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            service.delete_user("u1").await
        };
        let (updated, deleted) = tokio::join!(update, delete);

        assert!(deleted.unwrap());
        assert!(!updated.unwrap());
        assert!(service.get_user("u1").await.unwrap().is_none());
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_after_map_expired_does_not_restore_user() {
        let (service, store) =
            delayed_service(Duration::from_millis(50), Duration::from_millis(20));
        service.create_user("u1", "Alice").await.unwrap();

        assert!(!service.update_user("u1", "Bob").await.unwrap());
        assert!(service.get_user("u1").await.unwrap().is_none());
        assert!(store.write().await.ttl_remaining_ms(DEFAULT_USER_MAP).is_none());
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_name_rejected() {
        let (service, _) = service_with_store();
        let name = "x".repeat(crate::cache::MAX_VALUE_SIZE + 1);

        assert!(matches!(
            service.create_user("u1", &name).await,
            Err(AppError::InvalidRequest(_))
        ));
    }
}
