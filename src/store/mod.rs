//! Persistence ports and their sqlx-backed adapters.
//!
//! Uniqueness (username, employee email) is enforced by database constraints;
//! adapters translate a unique violation into the matching `AppError` variant.
//! Every employee query is keyed by the owner id as well as the record id.

pub mod cache;
pub mod mysql;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;
use crate::model::employee::{Employee, EmployeeId, EmployeeInput};
use crate::model::user::{User, UserId};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn exists(&self, username: &str) -> Result<bool, AppError>;
    /// Fails with `DuplicateUsername` if the name is already registered.
    async fn create(&self, username: &str, password_hash: &str) -> Result<UserId, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    /// Fails with `NotFound` if there is no such user.
    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fails with `DuplicateEmail` if any owner already has a record with this email.
    async fn insert(&self, owner_id: UserId, input: &EmployeeInput) -> Result<Employee, AppError>;
    async fn email_taken(&self, email: &str) -> Result<bool, AppError>;
    async fn find_owned(&self, owner_id: UserId, id: EmployeeId) -> Result<Option<Employee>, AppError>;
    async fn list_owned(&self, owner_id: UserId) -> Result<Vec<Employee>, AppError>;
    /// Returns `false` when no record with this id belongs to the owner.
    async fn update_owned(
        &self,
        owner_id: UserId,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<bool, AppError>;
    async fn delete_owned(&self, owner_id: UserId, id: EmployeeId) -> Result<bool, AppError>;
}

pub(crate) fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("User does not exist with given id: {user_id}"))
}
