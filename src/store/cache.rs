use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::CredentialStore;
use crate::error::AppError;
use crate::model::user::{User, UserId};

/// Wraps a credential store and remembers usernames known to be taken.
///
/// Only positive answers are cached. Users are never deleted, so a name that
/// was taken once stays taken and the cache can't go stale. Lookups are exact
/// (usernames are case-sensitive).
pub struct CachedCredentialStore {
    inner: Arc<dyn CredentialStore>,
    taken: Cache<String, ()>,
}

impl CachedCredentialStore {
    pub fn new(inner: Arc<dyn CredentialStore>, capacity: u64) -> Self {
        let taken = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(Duration::from_secs(86400)) // 24h
            .build();

        Self { inner, taken }
    }

    async fn mark_taken(&self, username: &str) {
        self.taken.insert(username.to_string(), ()).await;
    }
}

#[async_trait]
impl CredentialStore for CachedCredentialStore {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        if self.taken.contains_key(username) {
            debug!("Username cache hit");
            return Ok(true);
        }

        let exists = self.inner.exists(username).await?;
        if exists {
            self.mark_taken(username).await;
        }
        Ok(exists)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserId, AppError> {
        match self.inner.create(username, password_hash).await {
            Ok(id) => {
                self.mark_taken(username).await;
                Ok(id)
            }
            Err(AppError::DuplicateUsername) => {
                self.mark_taken(username).await;
                Err(AppError::DuplicateUsername)
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = self.inner.find_by_username(username).await?;
        if user.is_some() {
            self.mark_taken(username).await;
        }
        Ok(user)
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), AppError> {
        self.inner.update_password_hash(user_id, password_hash).await
    }
}
